mod admin_record;
mod distance;
mod history_summary;
pub(crate) mod route_data;
mod saved_route;

pub use admin_record::{AdminRecord, AuthFailure, AuthResult};
pub use distance::{Distance, DistanceField, DistanceUnit};
pub use history_summary::{relative_label, DeleteOutcome, DeleteStatus, HistorySummary};
pub use route_data::{Coordinates, Leg, RouteData, Stop};
pub use saved_route::SavedRoute;
