//! Terminator housekeeping.
//!
//! Every content-bearing track ends with exactly one synthetic `E` marker,
//! strictly after all musical content. Transforms strip the markers while
//! they rearrange the timeline and call [`ensure_terminator`] before they
//! hand the document back.

use crate::chart::event::{EventContext, NoteEvent};
use crate::chart::{ChartMetadata, Fumen};

/// Margin that keeps the terminator strictly after same-instant content.
const TERMINATOR_MARGIN: f64 = 1e-9;

/// Removes every terminator marker from the track's note list.
pub fn strip_terminators(fumen: &mut Fumen) {
    fumen.note_events.retain(|event| !event.is_terminator());
}

/// Strips any existing terminator markers and inserts a single fresh one
/// just after the track's latest content.
///
/// The marker lands at the latest content extent (hold and slide tails
/// included, timing events considered) plus a strict-ordering margin, and
/// copies position/tempo/scroll context from the latest real event. A track
/// without any content anchors the marker at the chart's lead-in offset with
/// the chart-wide tempo. Calling this twice in a row yields the same track
/// as calling it once.
pub fn ensure_terminator(fumen: &mut Fumen, metadata: &ChartMetadata) {
    strip_terminators(fumen);

    let mut latest: Option<(f64, EventContext)> = None;
    for event in fumen.musical_notes_by_time() {
        let end = event.end_time();
        if latest.is_none_or(|(t, _)| end >= t) {
            latest = Some((end, event.context()));
        }
    }
    let mut timings: Vec<_> = fumen.timing_events.iter().collect();
    timings.sort_by(|a, b| a.time.total_cmp(&b.time));
    for event in timings {
        if latest.is_none_or(|(t, _)| event.time >= t) {
            let context = EventContext {
                x_pos: 0,
                y_pos: 0,
                bpm_at_event: if event.bpm_at_event > 0.0 {
                    event.bpm_at_event
                } else {
                    metadata.fallback_bpm()
                },
                hspeed_at_event: event.hspeed_at_event,
            };
            latest = Some((event.time, context));
        }
    }

    let (anchor, context) = latest.unwrap_or_else(|| {
        (
            metadata.first_offset_sec,
            EventContext::at_bpm(metadata.fallback_bpm()),
        )
    });

    fumen
        .note_events
        .push(NoteEvent::terminator(anchor + TERMINATOR_MARGIN, &context));
    fumen.sort_events();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::event::NoteDetail;

    fn tap(time: f64, bpm: f64) -> NoteEvent {
        NoteEvent {
            time,
            x_pos: 3,
            y_pos: 1,
            raw_notation: "1".to_owned(),
            bpm_at_event: bpm,
            hspeed_at_event: 1.0,
            notes: vec![NoteDetail::tap()],
        }
    }

    #[test]
    fn marker_lands_after_hold_tail() {
        let metadata = ChartMetadata::default();
        let mut fumen = Fumen::new(0);
        let mut held = tap(1.0, 150.0);
        held.notes[0].hold_time = Some(2.0);
        fumen.note_events.push(held);

        ensure_terminator(&mut fumen, &metadata);

        let last = fumen.note_events.last().expect("terminator inserted");
        assert!(last.is_terminator());
        assert!(last.time > 3.0);
        assert!((last.bpm_at_event - 150.0).abs() < 1e-12);
        assert_eq!(last.x_pos, 3);
    }

    #[test]
    fn empty_track_anchors_at_lead_in() {
        let metadata = ChartMetadata {
            first_offset_sec: 1.5,
            ..ChartMetadata::default()
        };
        let mut fumen = Fumen::new(0);
        ensure_terminator(&mut fumen, &metadata);

        let last = fumen.note_events.last().expect("terminator inserted");
        assert!(last.is_terminator());
        assert!(last.time >= 1.5);
        assert!((last.bpm_at_event - 120.0).abs() < 1e-12);
    }
}
