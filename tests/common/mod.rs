//! Shared fixture builders for the integration tests.
#![allow(dead_code)]

use simai_edit::prelude::*;

/// A tap note event at `time` carrying `bpm`.
pub fn tap(time: f64, bpm: f64) -> NoteEvent {
    NoteEvent {
        time,
        x_pos: 0,
        y_pos: 0,
        raw_notation: "1".to_owned(),
        bpm_at_event: bpm,
        hspeed_at_event: 1.0,
        notes: vec![NoteDetail::tap()],
    }
}

/// A hold note event at `time` held for `hold` seconds.
pub fn hold(time: f64, bpm: f64, hold: f64) -> NoteEvent {
    let mut event = tap(time, bpm);
    event.raw_notation = "1h".to_owned();
    event.notes[0].hold_time = Some(hold);
    event
}

/// A slide note event at `time`, starting after `offset` and sliding for
/// `slide` seconds.
pub fn slide(time: f64, bpm: f64, offset: f64, slide: f64) -> NoteEvent {
    let mut event = tap(time, bpm);
    event.raw_notation = "1-5".to_owned();
    event.notes[0].slide_start_time_offset = Some(offset);
    event.notes[0].slide_time = Some(slide);
    event
}

/// A comma boundary at `time` carrying `bpm`.
pub fn comma(time: f64, bpm: f64) -> TimingEvent {
    TimingEvent {
        time,
        bpm_at_event: bpm,
        hspeed_at_event: 1.0,
    }
}

/// A document whose first track holds the given events, terminator
/// included per `finalize`.
pub fn single_track_doc(
    wholebpm: f64,
    first_offset_sec: f64,
    notes: Vec<NoteEvent>,
    timings: Vec<TimingEvent>,
) -> ChartDocument {
    let mut doc = ChartDocument::default();
    doc.metadata.wholebpm = wholebpm;
    doc.metadata.first_offset_sec = first_offset_sec;
    doc.tracks[0].note_events = notes;
    doc.tracks[0].timing_events = timings;
    doc.finalize();
    doc
}

/// Asserts both event lists of a track are non-decreasing in time.
pub fn assert_sorted(fumen: &Fumen) {
    let times: Vec<f64> = fumen.note_events.iter().map(|e| e.time).collect();
    assert!(
        times.windows(2).all(|pair| pair[0] <= pair[1]),
        "note events out of order: {times:?}"
    );
    let times: Vec<f64> = fumen.timing_events.iter().map(|e| e.time).collect();
    assert!(
        times.windows(2).all(|pair| pair[0] <= pair[1]),
        "timing events out of order: {times:?}"
    );
}

/// Asserts a track has exactly one terminator and it is strictly last.
pub fn assert_single_trailing_terminator(fumen: &Fumen) {
    let terminators = fumen
        .note_events
        .iter()
        .filter(|e| e.is_terminator())
        .count();
    assert_eq!(terminators, 1, "expected exactly one terminator");
    let last = fumen.note_events.last().expect("track has events");
    assert!(last.is_terminator(), "terminator is not last");
    for event in &fumen.note_events[..fumen.note_events.len() - 1] {
        assert!(
            event.time < last.time,
            "terminator at {} not strictly after event at {}",
            last.time,
            event.time
        );
    }
}

/// Asserts two floats agree within `tol`.
pub fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {expected}, got {actual} (tolerance {tol})"
    );
}
