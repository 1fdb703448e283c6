use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::SavedRoute;

pub const NO_ROUTES_LABEL: &str = "None";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub count: usize,
    pub total_distance_saved: String,
    pub most_recent_label: String,
}

impl HistorySummary {
    /// Summarizes `routes` as handed over by the caller. The most recent
    /// label comes from the first element, so callers pass routes newest
    /// first.
    pub fn from_routes(routes: &[SavedRoute], now: DateTime<Utc>) -> Self {
        let total_miles: f64 = routes
            .iter()
            .map(|route| route.total_distance.miles_or_zero())
            .sum();

        let most_recent_label = match routes.first() {
            Some(route) => relative_label(route.created_date, now),
            None => NO_ROUTES_LABEL.into(),
        };

        Self {
            count: routes.len(),
            total_distance_saved: format!("{:.1}", total_miles),
            most_recent_label,
        }
    }
}

/// Describes `then` relative to `now`, e.g. `"2 days ago"`.
pub fn relative_label(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);

    if elapsed.num_seconds() < 60 {
        return "just now".into();
    }

    let days = elapsed.num_days();

    let (amount, unit) = if elapsed.num_minutes() < 60 {
        (elapsed.num_minutes(), "minute")
    } else if elapsed.num_hours() < 24 {
        (elapsed.num_hours(), "hour")
    } else if days < 7 {
        (days, "day")
    } else if days < 30 {
        (days / 7, "week")
    } else if days < 365 {
        (days / 30, "month")
    } else {
        (days / 365, "year")
    };

    match amount {
        1 => format!("1 {} ago", unit),
        n => format!("{} {}s ago", n, unit),
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOutcome {
    pub index: usize,
    #[serde(flatten)]
    pub status: DeleteStatus,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeleteStatus {
    Deleted { id: Uuid },
    OutOfRange,
    Failed { id: Uuid, code: i32, message: String },
}

impl DeleteOutcome {
    pub fn is_deleted(&self) -> bool {
        matches!(self.status, DeleteStatus::Deleted { .. })
    }
}
