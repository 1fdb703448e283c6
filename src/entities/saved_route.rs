use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::route_data::{duration_label, parse_duration_label};
use crate::entities::{Distance, DistanceField, Leg, RouteData, Stop};

/// A previously computed route kept in the history list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedRoute {
    pub id: Uuid,
    pub route_name: Option<String>,
    pub total_distance: DistanceField,
    pub estimated_time: String,
    pub created_date: DateTime<Utc>,
    pub stops: Vec<Stop>,
    #[serde(default)]
    pub legs: Vec<Leg>,
}

impl SavedRoute {
    pub fn from_route_data(
        route: &RouteData,
        route_name: Option<String>,
        created_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            route_name,
            total_distance: DistanceField::Measured(route.total_distance),
            estimated_time: duration_label(route.estimated_minutes),
            created_date,
            stops: route.stops.clone(),
            legs: route.legs.clone(),
        }
    }

    #[tracing::instrument(skip_all, fields(id = %self.id))]
    pub fn to_route_data(&self) -> RouteData {
        let total_distance = self.total_distance.distance().unwrap_or_else(|| {
            tracing::warn!("malformed distance {:?}, defaulting to zero", self.total_distance);
            Distance::zero()
        });

        let estimated_minutes = parse_duration_label(&self.estimated_time).unwrap_or(0);

        RouteData {
            stops: self.stops.clone(),
            legs: self.legs.clone(),
            total_distance,
            estimated_minutes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Coordinates;

    fn stop(name: &str, latitude: f64, longitude: f64) -> Stop {
        Stop {
            name: name.into(),
            address: format!("{} street", name),
            coordinates: Coordinates {
                latitude,
                longitude,
            },
        }
    }

    fn route_data() -> RouteData {
        RouteData {
            stops: vec![
                stop("depot", 51.5072, -0.1276),
                stop("bakery", 51.5155, -0.0922),
                stop("florist", 51.5033, -0.1195),
            ],
            legs: vec![
                Leg {
                    distance: Distance::miles(2.137),
                    minutes: 11,
                    directions: vec!["Head east".into(), "Turn left".into()],
                },
                Leg {
                    distance: Distance::kilometers(3.3),
                    minutes: 14,
                    directions: vec!["Continue south".into()],
                },
            ],
            total_distance: Distance::miles(4.187),
            estimated_minutes: 85,
        }
    }

    #[test]
    fn reconstruct_saved_route_test() {
        let route = route_data();
        let saved = SavedRoute::from_route_data(&route, Some("Tuesday".into()), Utc::now());

        assert_eq!(saved.estimated_time, "1 hr 25 min");
        assert_eq!(saved.to_route_data(), route);
    }

    #[test]
    fn reconstruct_after_storage_test() {
        let route = route_data();
        let saved = SavedRoute::from_route_data(&route, None, Utc::now());

        let stored = serde_json::to_value(&saved).unwrap();
        let loaded: SavedRoute = serde_json::from_value(stored).unwrap();

        assert_eq!(loaded, saved);
        assert_eq!(loaded.to_route_data(), route);
    }

    #[test]
    fn reconstruct_legacy_record_test() {
        let legacy = serde_json::json!({
            "id": Uuid::new_v4(),
            "route_name": null,
            "total_distance": "12.3 miles",
            "estimated_time": "45 min",
            "created_date": "2024-03-01T10:00:00Z",
            "stops": [
                {"name": "a", "address": "1 a st", "coordinates": {"latitude": 1.0, "longitude": 2.0}},
                {"name": "b", "address": "2 b st", "coordinates": {"latitude": 3.0, "longitude": 4.0}}
            ]
        });

        let saved: SavedRoute = serde_json::from_value(legacy).unwrap();
        let route = saved.to_route_data();

        assert_eq!(route.total_distance, Distance::miles(12.3));
        assert_eq!(route.estimated_minutes, 45);
        assert_eq!(route.stops[0].name, "a");
        assert_eq!(route.stops[1].name, "b");
        assert!(route.legs.is_empty());
    }

    #[test]
    fn reconstruct_malformed_record_test() {
        let mut saved = SavedRoute::from_route_data(&route_data(), None, Utc::now());
        saved.total_distance = DistanceField::Legacy("bad".into());
        saved.estimated_time = "soon".into();

        let route = saved.to_route_data();

        assert_eq!(route.total_distance, Distance::zero());
        assert_eq!(route.estimated_minutes, 0);
        assert_eq!(route.stops.len(), 3);
    }
}
