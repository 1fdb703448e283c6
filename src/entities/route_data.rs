use serde::{Deserialize, Serialize};

use crate::entities::Distance;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub name: String,
    pub address: String,
    pub coordinates: Coordinates,
}

/// Travel between two consecutive stops.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub distance: Distance,
    pub minutes: u32,
    pub directions: Vec<String>,
}

/// An optimized multi-stop route as produced by the route planner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteData {
    pub stops: Vec<Stop>,
    pub legs: Vec<Leg>,
    pub total_distance: Distance,
    pub estimated_minutes: u32,
}

/// Renders a duration the way the history list shows it: `"45 min"`,
/// `"2 hr"` or `"1 hr 5 min"`.
pub fn duration_label(minutes: u32) -> String {
    let (hours, minutes) = (minutes / 60, minutes % 60);

    match (hours, minutes) {
        (0, m) => format!("{} min", m),
        (h, 0) => format!("{} hr", h),
        (h, m) => format!("{} hr {} min", h, m),
    }
}

/// Inverse of [`duration_label`].
pub fn parse_duration_label(label: &str) -> Option<u32> {
    let tokens: Vec<&str> = label.split_whitespace().collect();

    match tokens.as_slice() {
        [m, "min"] => m.parse().ok(),
        [h, "hr"] => h.parse::<u32>().ok()?.checked_mul(60),
        [h, "hr", m, "min"] => {
            let hours: u32 = h.parse().ok()?;
            let minutes: u32 = m.parse().ok()?;

            if minutes >= 60 {
                return None;
            }

            hours.checked_mul(60)?.checked_add(minutes)
        }
        _ => None,
    }
}

#[test]
fn duration_label_test() {
    assert_eq!(duration_label(0), "0 min");
    assert_eq!(duration_label(45), "45 min");
    assert_eq!(duration_label(120), "2 hr");
    assert_eq!(duration_label(65), "1 hr 5 min");

    for minutes in [0, 1, 59, 60, 61, 600, 1439] {
        assert_eq!(parse_duration_label(&duration_label(minutes)), Some(minutes));
    }
}

#[test]
fn parse_duration_label_rejects_unknown_formats_test() {
    assert_eq!(parse_duration_label("1h 5m"), None);
    assert_eq!(parse_duration_label("about an hour"), None);
    assert_eq!(parse_duration_label(""), None);
    assert_eq!(parse_duration_label("1 hr 75 min"), None);
}
