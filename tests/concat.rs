//! Tests for the concatenation transform.

mod common;

use common::*;
use pretty_assertions::assert_eq;
use simai_edit::prelude::*;

/// First chart: one tap at 1.0s on track 0, so its musical end is 1.0s.
fn first_chart() -> ChartDocument {
    single_track_doc(120.0, 0.0, vec![tap(1.0, 120.0)], vec![])
}

/// Second chart: lead-in 0.25s, one tap at 0.5s on track 0.
fn second_chart() -> ChartDocument {
    single_track_doc(140.0, 0.25, vec![tap(0.5, 140.0)], vec![])
}

fn musical_end(fumen: &Fumen) -> f64 {
    fumen.musical_end_time()
}

#[test]
fn spacer_policy_inserts_whole_beat_taps() {
    // 4 seconds of gap at 120 BPM fills floor(4.0 / 0.5) = 8 spacer beats
    let a = first_chart();
    let b = second_chart();
    let out = concatenate(&a, &b, 0, Gap::spacers(4.0), 120.0).expect("arguments are valid");

    let track = &out.tracks[0];
    let non_terminators = track
        .note_events
        .iter()
        .filter(|e| !e.is_terminator())
        .count();
    // A's tap + 8 spacers + B's tap
    assert_eq!(non_terminators, 10);

    // spacers run 1.0, 1.5, ... 4.5; each closes with a comma a beat later
    let spacer_times: Vec<f64> = track.note_events[1..9].iter().map(|e| e.time).collect();
    for (k, time) in spacer_times.iter().enumerate() {
        assert_close(*time, 1.0 + 0.5 * k as f64, 1e-9);
    }
    assert_eq!(track.timing_events.len(), 8);

    // B's tap appears a full gap after A's end, shifted by its lead-in
    let b_tap = &track.note_events[9];
    assert_close(b_tap.time, 1.0 + 4.0 + 0.5 - 0.25, 1e-9);

    assert_sorted(track);
    assert_single_trailing_terminator(track);
}

#[test]
fn marker_policy_writes_one_synthetic_tempo_segment() {
    let a = first_chart();
    let b = second_chart();
    let out = concatenate(&a, &b, 0, Gap::marker(3.0), 120.0).expect("arguments are valid");

    let track = &out.tracks[0];
    // marker right at A's end: a whole note at 80 BPM lasts exactly 3s
    let marker = &track.note_events[1];
    assert!(marker.notes.is_empty());
    assert_close(marker.time, 1.0, 1e-9);
    assert_close(marker.bpm_at_event, 80.0, 1e-9);
    assert!(marker.raw_notation.starts_with("(80.00000)"));

    // the closing comma ends the marker segment at the gap's end
    assert_eq!(track.timing_events.len(), 1);
    assert_close(track.timing_events[0].time, 4.0, 1e-9);
    assert_close(track.timing_events[0].bpm_at_event, 80.0, 1e-9);

    // B's tap lands after the gap, shifted by its lead-in
    let b_tap = track
        .note_events
        .iter()
        .filter(|e| !e.is_terminator())
        .last()
        .expect("B contributed a tap");
    assert_close(b_tap.time, 1.0 + 3.0 + 0.5 - 0.25, 1e-9);

    assert_sorted(track);
    assert_single_trailing_terminator(track);
}

#[test]
fn merged_length_agrees_for_both_policies() {
    let a = first_chart();
    let b = second_chart();
    let gap = 2.7;
    let expected_end = musical_end(&a.tracks[0]) + gap + musical_end(&b.tracks[0])
        - b.metadata.first_offset_sec;

    for gap_spec in [Gap::marker(gap), Gap::spacers(gap)] {
        let out = concatenate(&a, &b, 0, gap_spec, 120.0).expect("arguments are valid");
        assert_close(musical_end(&out.tracks[0]), expected_end, 1e-6);
    }
}

#[test]
fn trivial_gap_starts_b_at_a_end() {
    let a = first_chart();
    let b = second_chart();
    let out = concatenate(&a, &b, 0, Gap::marker(0.0), 120.0).expect("arguments are valid");

    let track = &out.tracks[0];
    // no gap events of any kind
    assert_eq!(track.timing_events.len(), 0);
    let b_tap = track
        .note_events
        .iter()
        .filter(|e| !e.is_terminator())
        .last()
        .expect("B contributed a tap");
    assert_close(b_tap.time, 1.0 + 0.5 - 0.25, 1e-9);
}

#[test]
fn empty_second_track_is_a_no_op_with_fresh_terminator() {
    let a = first_chart();
    let b = ChartDocument::default();
    let out = concatenate(&a, &b, 0, Gap::marker(2.0), 120.0).expect("arguments are valid");

    let track = &out.tracks[0];
    assert_eq!(
        track
            .note_events
            .iter()
            .filter(|e| !e.is_terminator())
            .count(),
        1
    );
    assert_eq!(track.timing_events.len(), 0);
    assert_single_trailing_terminator(track);
}

#[test]
fn second_charts_level_label_is_adopted() {
    let a = first_chart();
    let mut b = second_chart();
    b.tracks[0].level_info = "12".to_owned();
    let out = concatenate(&a, &b, 0, Gap::marker(1.0), 120.0).expect("arguments are valid");

    assert_eq!(out.metadata.levels[0], "12");
    assert_eq!(out.tracks[0].level_info, "12");
}

#[test]
fn level_label_falls_back_to_second_charts_metadata() {
    let a = first_chart();
    let mut b = second_chart();
    b.metadata.levels[0] = "11+".to_owned();
    let out = concatenate(&a, &b, 0, Gap::marker(1.0), 120.0).expect("arguments are valid");

    assert_eq!(out.metadata.levels[0], "11+");
}

#[test]
fn lone_trailing_terminator_of_b_is_not_copied() {
    let a = first_chart();
    // B: just a tap and its terminator, no timing events
    let b = second_chart();
    let b_terminators = b.tracks[0]
        .note_events
        .iter()
        .filter(|e| e.is_terminator())
        .count();
    assert_eq!(b_terminators, 1);

    let out = concatenate(&a, &b, 0, Gap::marker(1.0), 120.0).expect("arguments are valid");
    assert_single_trailing_terminator(&out.tracks[0]);
}

#[test]
fn concatenate_validates_its_arguments() {
    let a = first_chart();
    let b = second_chart();
    assert!(matches!(
        concatenate(&a, &b, 7, Gap::marker(1.0), 120.0),
        Err(EditError::DifficultyOutOfRange(7))
    ));
    assert!(matches!(
        concatenate(&a, &b, 0, Gap::marker(-1.0), 120.0),
        Err(EditError::NegativeGap(_))
    ));
    assert!(matches!(
        concatenate(&a, &b, 0, Gap::marker(1.0), 0.0),
        Err(EditError::NonPositiveBpm(_))
    ));
}

#[test]
fn inputs_are_not_mutated() {
    let a = first_chart();
    let b = second_chart();
    let (a_before, b_before) = (a.clone(), b.clone());
    let _ = concatenate(&a, &b, 0, Gap::spacers(2.0), 120.0).expect("arguments are valid");
    assert_eq!(a, a_before);
    assert_eq!(b, b_before);
}
