//! Chart-wide header fields.

use std::collections::BTreeMap;

use crate::chart::model::DIFFICULTY_SLOTS;
use crate::timing::DEFAULT_BPM;

/// The chart-wide header of a document.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChartMetadata {
    /// The chart-wide tempo declared by the `&wholebpm` field.
    pub wholebpm: f64,
    /// Lead-in before the chart's time zero, in seconds. Never negative.
    pub first_offset_sec: f64,
    /// Level label per difficulty slot. Empty string for unused slots.
    pub levels: [String; DIFFICULTY_SLOTS],
    /// Header fields the transforms do not interpret, preserved verbatim.
    pub extra: BTreeMap<String, String>,
}

impl Default for ChartMetadata {
    fn default() -> Self {
        Self {
            wholebpm: DEFAULT_BPM,
            first_offset_sec: 0.0,
            levels: std::array::from_fn(|_| String::new()),
            extra: BTreeMap::new(),
        }
    }
}

impl ChartMetadata {
    /// The chart-wide tempo, or [`DEFAULT_BPM`] when the declared value is
    /// unusable as a grid tempo.
    #[must_use]
    pub fn fallback_bpm(&self) -> f64 {
        if self.wholebpm > 0.0 {
            self.wholebpm
        } else {
            DEFAULT_BPM
        }
    }

    /// The level label of a difficulty slot, empty when out of range.
    #[must_use]
    pub fn level(&self, difficulty: usize) -> &str {
        self.levels.get(difficulty).map_or("", String::as_str)
    }
}
