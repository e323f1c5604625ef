//! Cropping a document to a time window.

use log::debug;

use crate::chart::{ChartDocument, DIFFICULTY_SLOTS, Fumen};
use crate::edit::terminator::ensure_terminator;
use crate::edit::{EditError, Result};
use crate::timing::{active_bpm, snap_to_grid};

/// Tolerance absorbing floating error at the window edges.
const TIME_EPSILON: f64 = 1e-6;

/// A crop window in absolute seconds of the source timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropWindow {
    /// Desired window start.
    pub start_sec: f64,
    /// Desired window end.
    pub end_sec: f64,
}

impl CropWindow {
    /// A window spanning `[start_sec, end_sec]`.
    #[must_use]
    pub const fn new(start_sec: f64, end_sec: f64) -> Self {
        Self { start_sec, end_sec }
    }
}

/// Crops a document to `window`, re-basing all kept events to time zero.
///
/// The window start is snapped once against the tempo of a representative
/// selected track; each selected track then snaps the window end against its
/// own tempo there, so tracks with diverging tempo maps keep their own grid.
/// Kept notes have holds and slides truncated to the part that fell inside
/// the window. The lead-in offset is recomputed so the new timeline's zero
/// still lands on a beat boundary. Tracks outside `tracks` are carried over
/// unmodified when they have content, and normalized to empty placeholders
/// otherwise.
///
/// `tracks` selects the difficulty slots to crop; `None` selects every slot
/// that has musical content or a level label. Out-of-range indices are
/// ignored.
///
/// # Errors
///
/// [`EditError::EmptyCropWindow`] when the window end is not after its
/// start. The input document is left unmodified.
pub fn crop(
    doc: &ChartDocument,
    window: CropWindow,
    tracks: Option<&[usize]>,
) -> Result<ChartDocument> {
    if window.end_sec <= window.start_sec
        || !window.start_sec.is_finite()
        || !window.end_sec.is_finite()
    {
        return Err(EditError::EmptyCropWindow {
            start: window.start_sec,
            end: window.end_sec,
        });
    }

    let selected: Vec<usize> = match tracks {
        Some(indices) => indices
            .iter()
            .copied()
            .filter(|&i| i < DIFFICULTY_SLOTS)
            .collect(),
        None => doc.active_slots(),
    };

    let fallback = doc.metadata.fallback_bpm();
    let snapped_start = snap_window_start(doc, &selected, window.start_sec, fallback);
    debug!(
        "crop: window [{:.3}, {:.3}]s, start snapped to {snapped_start:.6}s",
        window.start_sec, window.end_sec
    );

    let mut out = ChartDocument::with_metadata(doc.metadata.clone());
    out.metadata.first_offset_sec =
        recompute_lead_in(doc, &selected, snapped_start, fallback);

    for (i, source) in doc.tracks.iter().enumerate() {
        if selected.contains(&i) {
            out.tracks[i] = crop_track(doc, source, window.end_sec, snapped_start, fallback);
        } else if source.has_content() {
            out.tracks[i] = source.clone();
        } else {
            let mut placeholder = Fumen::new(i);
            placeholder.level_info = doc.metadata.level(i).to_owned();
            out.tracks[i] = placeholder;
        }
    }

    let ChartDocument { metadata, tracks } = &mut out;
    for &i in &selected {
        if tracks[i].has_content() {
            ensure_terminator(&mut tracks[i], metadata);
        }
    }
    Ok(out)
}

/// Snaps the desired window start against the tempo of a representative
/// selected track, preferring one that actually has events.
fn snap_window_start(doc: &ChartDocument, selected: &[usize], start: f64, fallback: f64) -> f64 {
    let representative = selected
        .iter()
        .find(|&&i| doc.tracks[i].has_events())
        .or_else(|| selected.first());
    match representative {
        Some(&i) => {
            let bpm = active_bpm(&doc.tracks[i], start, fallback);
            snap_to_grid(start, bpm)
        }
        None => snap_to_grid(start, fallback),
    }
}

/// The new lead-in before time zero.
///
/// When the snapped start still lies inside the original lead-in, the
/// remainder of it carries over. When the crop starts after the chart's
/// nominal zero, the new lead-in becomes the remaining fraction of the beat
/// in progress at the cut, so the new timeline's zero lands on a beat
/// boundary again.
fn recompute_lead_in(
    doc: &ChartDocument,
    selected: &[usize],
    snapped_start: f64,
    fallback: f64,
) -> f64 {
    let original_offset = doc.metadata.first_offset_sec;
    let carried = original_offset - snapped_start;
    if carried >= -TIME_EPSILON {
        return carried.max(0.0);
    }

    let bpm_source = selected
        .iter()
        .map(|&i| &doc.tracks[i])
        .find(|track| track.has_events())
        .or_else(|| doc.tracks.iter().find(|track| track.has_events()));
    let bpm = match bpm_source {
        Some(track) => active_bpm(track, snapped_start, fallback),
        None => fallback,
    };
    if bpm <= 0.0 {
        return 0.0;
    }

    let beat_duration = 60.0 / bpm;
    if beat_duration <= 1e-9 {
        return 0.0;
    }
    let elapsed = snapped_start - original_offset;
    let within_beat = elapsed % beat_duration;
    if within_beat.abs() <= TIME_EPSILON || (beat_duration - within_beat).abs() <= TIME_EPSILON {
        0.0
    } else {
        beat_duration - within_beat
    }
}

/// Crops one selected track against its own snapped window end.
fn crop_track(
    doc: &ChartDocument,
    source: &Fumen,
    end: f64,
    snapped_start: f64,
    fallback: f64,
) -> Fumen {
    let end_bpm = active_bpm(source, end, fallback);
    let snapped_end = snap_to_grid(end, end_bpm);
    let new_duration = (snapped_end - snapped_start).max(0.0);
    debug!(
        "crop: track {}: end snapped to {snapped_end:.6}s, new duration {new_duration:.6}s",
        source.difficulty_index
    );

    let mut out = Fumen::new(source.difficulty_index);
    out.level_info = if source.level_info.is_empty() {
        doc.metadata.level(source.difficulty_index).to_owned()
    } else {
        source.level_info.clone()
    };
    out.extra = source.extra.clone();
    if new_duration <= TIME_EPSILON {
        return out;
    }

    for event in &source.note_events {
        let translated = event.time - snapped_start;
        if translated < -TIME_EPSILON || translated >= new_duration - TIME_EPSILON {
            continue;
        }
        let kept_time = translated.max(0.0);
        let mut kept = event.clone();
        kept.time = kept_time;
        for note in &mut kept.notes {
            if let Some(hold) = note.hold_time {
                // re-express the absolute hold end relative to the cut, then
                // floor at the kept event time
                let hold_end = event.time + hold - snapped_start;
                note.hold_time = Some((hold_end - kept_time).max(0.0));
            }
            if let Some(slide) = note.slide_time {
                let slide_start = event.time + note.slide_start_time_offset.unwrap_or(0.0);
                let slide_end = slide_start + slide - snapped_start;
                if note.slide_start_time_offset.is_some() {
                    note.slide_start_time_offset =
                        Some((slide_start - snapped_start - kept_time).max(0.0));
                }
                let new_slide_start = kept_time + note.slide_start_time_offset.unwrap_or(0.0);
                note.slide_time = Some((slide_end - new_slide_start).max(0.0));
            }
        }
        out.note_events.push(kept);
    }

    for event in &source.timing_events {
        let translated = event.time - snapped_start;
        if translated < -TIME_EPSILON || translated >= new_duration - TIME_EPSILON {
            continue;
        }
        let mut kept = event.clone();
        kept.time = translated.max(0.0);
        out.timing_events.push(kept);
    }

    out
}
