//! Tempo grid lookups and beat-grid snapping.

use itertools::Itertools;
use log::warn;

use crate::chart::Fumen;

/// Tempo assumed when a chart provides no usable one.
pub const DEFAULT_BPM: f64 = 120.0;

/// Beats per whole note on the snapping grid.
pub const BEATS_PER_WHOLE: u32 = 4;

/// Number of grid subdivisions per whole note.
pub const GRID_SUBDIVISIONS: u32 = 256;

/// Grid steps at or below this are considered degenerate and not snapped to.
const MIN_GRID_STEP: f64 = 1e-9;

/// The tempo active at `at` seconds in a track.
///
/// Note and timing events are merged by time; at equal timestamps, timing
/// and empty-content events are treated as having occurred before note
/// content, so a same-instant note's tempo wins the tie. The scan keeps the
/// last positive tempo at or before `at`. When no event qualifies, the first
/// event's tempo is used if the track has any, otherwise `fallback`.
#[must_use]
pub fn active_bpm(fumen: &Fumen, at: f64, fallback: f64) -> f64 {
    // tie class 0: timing events and note events without note content
    let notes = fumen.note_events.iter().map(|event| {
        let class = u8::from(!event.notes.is_empty());
        (event.time, class, event.bpm_at_event)
    });
    let timings = fumen
        .timing_events
        .iter()
        .map(|event| (event.time, 0_u8, event.bpm_at_event));
    let ordered: Vec<(f64, u8, f64)> = notes
        .chain(timings)
        .sorted_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
        .collect();

    let mut active = None;
    for &(time, _, bpm) in &ordered {
        if time > at {
            break;
        }
        if bpm > 0.0 {
            active = Some(bpm);
        }
    }
    active
        .or_else(|| ordered.first().map(|&(_, _, bpm)| bpm).filter(|&bpm| bpm > 0.0))
        .unwrap_or(fallback)
}

/// Snaps `time_sec` to the nearest grid subdivision of the default grid
/// ([`BEATS_PER_WHOLE`] beats per whole note, [`GRID_SUBDIVISIONS`]
/// subdivisions).
#[must_use]
pub fn snap_to_grid(time_sec: f64, bpm: f64) -> f64 {
    snap_to_grid_with(time_sec, bpm, BEATS_PER_WHOLE, GRID_SUBDIVISIONS)
}

/// Snaps `time_sec` to the nearest subdivision of the beat grid implied by
/// `bpm`.
///
/// The grid step is `(60 / bpm) / (subdivisions / beats_per_whole)`. An
/// unusable tempo or a degenerate step leaves the timestamp unchanged; a bad
/// tempo somewhere in a chart must not abort a whole transform.
#[must_use]
pub fn snap_to_grid_with(time_sec: f64, bpm: f64, beats_per_whole: u32, subdivisions: u32) -> f64 {
    if bpm.is_nan() || bpm <= 0.0 || beats_per_whole == 0 {
        warn!("cannot snap {time_sec}s: unusable tempo {bpm} BPM");
        return time_sec;
    }
    let beat_duration = 60.0 / bpm;
    let steps_per_beat = f64::from(subdivisions) / f64::from(beats_per_whole);
    let step = beat_duration / steps_per_beat;
    if !step.is_finite() || step <= MIN_GRID_STEP {
        warn!("cannot snap {time_sec}s: grid step {step} too small at {bpm} BPM");
        return time_sec;
    }
    (time_sec / step).round() * step
}
