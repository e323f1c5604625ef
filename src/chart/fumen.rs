//! One difficulty's note chart.

use std::collections::BTreeMap;

use itertools::Itertools;

use crate::chart::event::{NoteEvent, TimingEvent};

/// One difficulty track: the ordered note and comma timelines plus the
/// slot's level label.
///
/// Event lists must be sorted ascending by time before serialization; every
/// transform re-establishes that invariant via [`Fumen::sort_events`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fumen {
    /// Which difficulty slot (0..7) this track occupies.
    pub difficulty_index: usize,
    /// The level label of this track. Empty for unused slots.
    pub level_info: String,
    /// Note events, sorted ascending by time.
    pub note_events: Vec<NoteEvent>,
    /// Comma boundary events, sorted ascending by time.
    pub timing_events: Vec<TimingEvent>,
    /// Track fields the transforms do not interpret, preserved verbatim.
    pub extra: BTreeMap<String, String>,
}

impl Fumen {
    /// An empty track for the given difficulty slot.
    #[must_use]
    pub fn new(difficulty_index: usize) -> Self {
        Self {
            difficulty_index,
            level_info: String::new(),
            note_events: Vec::new(),
            timing_events: Vec::new(),
            extra: BTreeMap::new(),
        }
    }

    /// Whether the track carries any events at all, terminators included.
    #[must_use]
    pub fn has_events(&self) -> bool {
        !self.note_events.is_empty() || !self.timing_events.is_empty()
    }

    /// Whether the track carries musical content: a non-terminator note
    /// event, or any timing event.
    #[must_use]
    pub fn has_musical_content(&self) -> bool {
        !self.timing_events.is_empty()
            || self.note_events.iter().any(|event| !event.is_terminator())
    }

    /// Whether the track counts as active: musical content or a non-empty
    /// level label. Active tracks must end with a terminator marker.
    #[must_use]
    pub fn has_content(&self) -> bool {
        self.has_musical_content() || !self.level_info.is_empty()
    }

    /// Iterates the note events that are not terminator markers.
    pub fn musical_notes(&self) -> impl Iterator<Item = &NoteEvent> {
        self.note_events
            .iter()
            .filter(|event| !event.is_terminator())
    }

    /// Iterates the non-terminator note events sorted ascending by time,
    /// regardless of the list's current order.
    pub fn musical_notes_by_time(&self) -> impl Iterator<Item = &NoteEvent> {
        self.musical_notes()
            .sorted_by(|a, b| a.time.total_cmp(&b.time))
    }

    /// The time the track's musical content ends: the latest extent of any
    /// non-terminator note (holds and slides included) or timing event.
    /// Zero for a track without musical content.
    #[must_use]
    pub fn musical_end_time(&self) -> f64 {
        let notes_end = self
            .musical_notes()
            .map(NoteEvent::end_time)
            .fold(0.0, f64::max);
        self.timing_events
            .iter()
            .map(|event| event.time)
            .fold(notes_end, f64::max)
    }

    /// Re-sorts both event lists ascending by time. The sort is stable, so
    /// same-instant events keep their insertion order.
    pub fn sort_events(&mut self) {
        self.note_events
            .sort_by(|a, b| a.time.total_cmp(&b.time));
        self.timing_events
            .sort_by(|a, b| a.time.total_cmp(&b.time));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::event::{EventContext, NoteDetail};

    fn tap(time: f64) -> NoteEvent {
        NoteEvent {
            time,
            x_pos: 0,
            y_pos: 0,
            raw_notation: "1".to_owned(),
            bpm_at_event: 120.0,
            hspeed_at_event: 1.0,
            notes: vec![NoteDetail::tap()],
        }
    }

    #[test]
    fn musical_end_time_includes_hold_extent_and_commas() {
        let mut fumen = Fumen::new(0);
        let mut held = tap(1.0);
        held.notes[0].hold_time = Some(2.5);
        fumen.note_events.push(held);
        fumen.timing_events.push(TimingEvent {
            time: 2.0,
            bpm_at_event: 120.0,
            hspeed_at_event: 1.0,
        });
        assert!((fumen.musical_end_time() - 3.5).abs() < 1e-12);
    }

    #[test]
    fn terminator_does_not_count_as_musical_content() {
        let mut fumen = Fumen::new(0);
        fumen
            .note_events
            .push(NoteEvent::terminator(5.0, &EventContext::at_bpm(120.0)));
        assert!(!fumen.has_musical_content());
        assert!(fumen.musical_end_time().abs() < 1e-12);
    }

    #[test]
    fn sort_events_orders_by_time() {
        let mut fumen = Fumen::new(0);
        fumen.note_events.push(tap(2.0));
        fumen.note_events.push(tap(0.5));
        fumen.note_events.push(tap(1.0));
        fumen.sort_events();
        let times: Vec<f64> = fumen.note_events.iter().map(|e| e.time).collect();
        assert_eq!(times, vec![0.5, 1.0, 2.0]);
    }
}
