//! Timeline transforms over a [`ChartDocument`](crate::chart::ChartDocument).
//!
//! Each transform reads its input document(s) by reference and returns a new
//! document; inputs are never mutated. After any transform the per-track
//! event lists are sorted by time, all temporal quantities are non-negative,
//! and every content-bearing track ends with exactly one terminator marker.

use thiserror::Error;

pub mod concat;
pub mod crop;
pub mod scale;
pub mod terminator;

pub use concat::{Gap, GapPolicy, concatenate};
pub use crop::{CropWindow, crop};
pub use scale::scale;
pub use terminator::{ensure_terminator, strip_terminators};

use crate::chart::DIFFICULTY_SLOTS;

/// An argument error that aborts a transform before it touches anything.
///
/// Degenerate tempo values inside a chart are not in this category; they are
/// recovered locally (see [`crate::timing`]) and never abort a transform.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    /// The crop window does not span any time.
    #[error("crop window is empty: start {start}s is not before end {end}s")]
    EmptyCropWindow {
        /// Requested window start, in seconds.
        start: f64,
        /// Requested window end, in seconds.
        end: f64,
    },
    /// The time-scale factor cannot stretch a timeline.
    #[error("time-scale factor must be positive and finite, got {0}")]
    NonPositiveFactor(f64),
    /// The reference tempo for phrasing a gap is unusable.
    #[error("reference tempo must be positive, got {0} BPM")]
    NonPositiveBpm(f64),
    /// The requested gap would rewind time.
    #[error("gap duration must not be negative, got {0}s")]
    NegativeGap(f64),
    /// The difficulty slot does not exist.
    #[error("difficulty slot {0} is out of range (charts have {DIFFICULTY_SLOTS} slots)")]
    DifficultyOutOfRange(usize),
}

/// Result of a transform.
pub type Result<T> = std::result::Result<T, EditError>;
