//! Duration buckets as plain data.
//!
//! A bucket is a labelled numeric range over the derived duration in
//! minutes. Buckets may overlap ("~1 hour" and "1-2 hours" both hold 62
//! minutes), so a film can satisfy several labels at once.

use crate::error::{FilterError, Result};
use serde::{Deserialize, Serialize};

/// Range kinds over whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DurationRange {
    /// `minutes < max`
    LessThan { max: u32 },
    /// `min <= minutes <= max`
    Inclusive { min: u32, max: u32 },
    /// `min < minutes <= max`
    LeftOpen { min: u32, max: u32 },
    /// `minutes > min`
    GreaterThan { min: u32 },
}

impl DurationRange {
    pub fn contains(&self, minutes: u32) -> bool {
        match *self {
            DurationRange::LessThan { max } => minutes < max,
            DurationRange::Inclusive { min, max } => (min..=max).contains(&minutes),
            DurationRange::LeftOpen { min, max } => minutes > min && minutes <= max,
            DurationRange::GreaterThan { min } => minutes > min,
        }
    }
}

/// A selectable duration bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationBucket {
    /// Short identifier, e.g. `1-2h`
    pub key: String,
    /// Display label, e.g. `1-2 hours`
    pub label: String,
    pub range: DurationRange,
}

impl DurationBucket {
    pub fn new(key: impl Into<String>, label: impl Into<String>, range: DurationRange) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            range,
        }
    }

    pub fn contains(&self, minutes: u32) -> bool {
        self.range.contains(minutes)
    }

    /// The built-in bucket table, in display order.
    pub fn presets() -> Vec<DurationBucket> {
        vec![
            DurationBucket::new("under-1h", "< 1 hour", DurationRange::LessThan { max: 60 }),
            DurationBucket::new(
                "about-1h",
                "~1 hour",
                DurationRange::Inclusive { min: 55, max: 65 },
            ),
            DurationBucket::new(
                "1-2h",
                "1-2 hours",
                DurationRange::LeftOpen { min: 60, max: 120 },
            ),
            DurationBucket::new("over-2h", "> 2 hours", DurationRange::GreaterThan { min: 120 }),
        ]
    }

    /// Look up a preset by key or label, ignoring case and surrounding space.
    pub fn resolve(name: &str) -> Result<DurationBucket> {
        let wanted = name.trim().to_lowercase();
        let presets = Self::presets();
        let available = presets
            .iter()
            .map(|b| b.key.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        presets
            .into_iter()
            .find(|b| b.key.to_lowercase() == wanted || b.label.to_lowercase() == wanted)
            .ok_or_else(|| FilterError::UnknownDurationBucket {
                name: name.to_string(),
                available,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_bounds() {
        let under = DurationRange::LessThan { max: 60 };
        assert!(under.contains(0));
        assert!(under.contains(59));
        assert!(!under.contains(60));

        let around = DurationRange::Inclusive { min: 55, max: 65 };
        assert!(around.contains(55) && around.contains(65));
        assert!(!around.contains(54) && !around.contains(66));

        let one_to_two = DurationRange::LeftOpen { min: 60, max: 120 };
        assert!(!one_to_two.contains(60));
        assert!(one_to_two.contains(61) && one_to_two.contains(120));
        assert!(!one_to_two.contains(121));

        let over = DurationRange::GreaterThan { min: 120 };
        assert!(!over.contains(120));
        assert!(over.contains(121));
    }

    #[test]
    fn test_ninety_minutes() {
        let one_to_two = DurationBucket::resolve("1-2h").unwrap();
        let under = DurationBucket::resolve("under-1h").unwrap();

        assert!(one_to_two.contains(90));
        assert!(!under.contains(90));
    }

    #[test]
    fn test_overlapping_buckets() {
        let matching: Vec<String> = DurationBucket::presets()
            .into_iter()
            .filter(|b| b.contains(62))
            .map(|b| b.key)
            .collect();

        assert_eq!(matching, vec!["about-1h", "1-2h"]);
    }

    #[test]
    fn test_zero_minutes_only_in_under_an_hour() {
        let matching: Vec<String> = DurationBucket::presets()
            .into_iter()
            .filter(|b| b.contains(0))
            .map(|b| b.key)
            .collect();

        assert_eq!(matching, vec!["under-1h"]);
    }

    #[test]
    fn test_resolve_by_label_and_key() {
        assert_eq!(DurationBucket::resolve(" ~1 HOUR ").unwrap().key, "about-1h");
        assert_eq!(DurationBucket::resolve("OVER-2H").unwrap().label, "> 2 hours");

        let err = DurationBucket::resolve("feature length").unwrap_err();
        assert!(matches!(err, FilterError::UnknownDurationBucket { .. }));
        assert!(err.to_string().contains("under-1h"));
    }

    #[test]
    fn test_bucket_serializes_as_data() {
        let bucket = DurationBucket::resolve("1-2h").unwrap();
        let json = serde_json::to_string(&bucket).unwrap();

        assert!(json.contains("\"kind\":\"left_open\""));
        let back: DurationBucket = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bucket);
    }
}
