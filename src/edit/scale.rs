//! Uniform time scaling.

use crate::chart::ChartDocument;
use crate::edit::{EditError, Result};

/// Factors within this distance of 1.0 are treated as a no-op.
const UNITY_TOLERANCE: f64 = 1e-9;

/// Uniformly rescales a document's timeline by `factor`.
///
/// A factor above 1 accelerates playback: every time, hold, slide and offset
/// is divided by the factor while every tempo (including `wholebpm`) is
/// multiplied by it, so the chart keeps its musical shape at the new speed.
/// All non-temporal fields are untouched. Applying `factor` and then
/// `1/factor` reproduces the original within floating tolerance.
///
/// # Errors
///
/// [`EditError::NonPositiveFactor`] when `factor` is not a positive finite
/// number. The input document is left unmodified.
pub fn scale(doc: &ChartDocument, factor: f64) -> Result<ChartDocument> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(EditError::NonPositiveFactor(factor));
    }
    let mut out = doc.clone();
    if (factor - 1.0).abs() <= UNITY_TOLERANCE {
        return Ok(out);
    }

    out.metadata.first_offset_sec /= factor;
    out.metadata.wholebpm *= factor;

    for track in &mut out.tracks {
        for event in &mut track.note_events {
            event.time /= factor;
            event.bpm_at_event *= factor;
            for note in &mut event.notes {
                if let Some(hold) = &mut note.hold_time {
                    *hold /= factor;
                }
                if let Some(offset) = &mut note.slide_start_time_offset {
                    *offset /= factor;
                }
                if let Some(slide) = &mut note.slide_time {
                    *slide /= factor;
                }
            }
        }
        for event in &mut track.timing_events {
            event.time /= factor;
            event.bpm_at_event *= factor;
        }
    }
    Ok(out)
}
