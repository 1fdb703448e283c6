use std::fmt;

use serde::{Deserialize, Serialize};

const KILOMETERS_PER_MILE: f64 = 1.609344;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    Miles,
    Kilometers,
}

impl DistanceUnit {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Miles => "miles",
            Self::Kilometers => "km",
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix.to_ascii_lowercase().as_str() {
            "" | "mi" | "mile" | "miles" => Some(Self::Miles),
            "km" | "kilometer" | "kilometers" | "kilometre" | "kilometres" => {
                Some(Self::Kilometers)
            }
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Distance {
    pub value: f64,
    pub unit: DistanceUnit,
}

impl Distance {
    pub fn miles(value: f64) -> Self {
        Self {
            value,
            unit: DistanceUnit::Miles,
        }
    }

    pub fn kilometers(value: f64) -> Self {
        Self {
            value,
            unit: DistanceUnit::Kilometers,
        }
    }

    pub fn zero() -> Self {
        Self::miles(0.0)
    }

    pub fn to_miles(&self) -> f64 {
        match self.unit {
            DistanceUnit::Miles => self.value,
            DistanceUnit::Kilometers => self.value / KILOMETERS_PER_MILE,
        }
    }

    /// Parses a textual distance such as `"12.3 miles"` or `"4km"`.
    ///
    /// Returns `None` when the leading numeric portion is missing or not
    /// finite, or when the suffix does not name a known unit.
    pub fn parse_text(text: &str) -> Option<Self> {
        let text = text.trim();

        let is_numeric = |i: usize, c: char| {
            c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+'))
        };

        let split = text
            .char_indices()
            .find(|&(i, c)| !is_numeric(i, c))
            .map(|(i, _)| i)
            .unwrap_or(text.len());

        let (numeric, suffix) = text.split_at(split);
        let value: f64 = numeric.parse().ok()?;

        if !value.is_finite() {
            return None;
        }

        let unit = DistanceUnit::from_suffix(suffix.trim())?;

        Some(Self { value, unit })
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} {}", self.value, self.unit.label())
    }
}

/// Distance as persisted on a saved route.
///
/// Records written by this crate carry a structured quantity. Older records
/// carry free text with a unit suffix and are only ever read.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DistanceField {
    Measured(Distance),
    Legacy(String),
}

impl DistanceField {
    /// Malformed legacy text yields `None`.
    pub fn distance(&self) -> Option<Distance> {
        match self {
            Self::Measured(distance) => Some(*distance),
            Self::Legacy(text) => Distance::parse_text(text),
        }
    }

    pub fn miles_or_zero(&self) -> f64 {
        self.distance().map(|d| d.to_miles()).unwrap_or(0.0)
    }
}

impl fmt::Display for DistanceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Measured(distance) => distance.fmt(f),
            Self::Legacy(text) => f.write_str(text),
        }
    }
}

#[test]
fn parse_text_test() {
    assert_eq!(Distance::parse_text("12.3 miles"), Some(Distance::miles(12.3)));
    assert_eq!(Distance::parse_text("  7 mi "), Some(Distance::miles(7.0)));
    assert_eq!(Distance::parse_text("4.5km"), Some(Distance::kilometers(4.5)));
    assert_eq!(Distance::parse_text("2"), Some(Distance::miles(2.0)));

    assert_eq!(Distance::parse_text("bad"), None);
    assert_eq!(Distance::parse_text(""), None);
    assert_eq!(Distance::parse_text("miles"), None);
    assert_eq!(Distance::parse_text("1.2.3 miles"), None);
    assert_eq!(Distance::parse_text("12 parsecs"), None);
}

#[test]
fn distance_field_deserialize_test() {
    let measured: DistanceField =
        serde_json::from_value(serde_json::json!({"value": 3.25, "unit": "miles"})).unwrap();
    assert_eq!(measured, DistanceField::Measured(Distance::miles(3.25)));

    let legacy: DistanceField = serde_json::from_value(serde_json::json!("3.2 miles")).unwrap();
    assert_eq!(legacy, DistanceField::Legacy("3.2 miles".into()));
    assert_eq!(legacy.miles_or_zero(), 3.2);

    let malformed = DistanceField::Legacy("unknown".into());
    assert_eq!(malformed.miles_or_zero(), 0.0);
}

#[test]
fn to_miles_test() {
    let distance = Distance::kilometers(1.609344);
    assert!((distance.to_miles() - 1.0).abs() < 1e-9);
    assert_eq!(Distance::miles(12.34).to_string(), "12.3 miles");
}
