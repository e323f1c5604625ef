//! Definitions of the timeline events.

/// Raw notation of the synthetic end-of-track marker.
///
/// A [`NoteEvent`] whose `raw_notation` is this literal (and whose `notes`
/// list is empty) terminates a track. Every content-bearing track carries
/// exactly one, chronologically after all musical content.
pub const TERMINATOR_NOTATION: &str = "E";

/// One simultaneous note within a [`NoteEvent`].
///
/// A detail with neither a hold nor a slide is an instantaneous tap.
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoteDetail {
    /// How long the note is held down after the parent event's time.
    pub hold_time: Option<f64>,
    /// Delay after the parent event's time before the slide path begins.
    pub slide_start_time_offset: Option<f64>,
    /// Duration of the slide path from its own start.
    pub slide_time: Option<f64>,
}

impl NoteDetail {
    /// A plain tap with no hold and no slide.
    #[must_use]
    pub const fn tap() -> Self {
        Self {
            hold_time: None,
            slide_start_time_offset: None,
            slide_time: None,
        }
    }

    /// The absolute time this note stops occupying the timeline, given the
    /// parent event's time. Holds extend the note by their duration; a slide
    /// ends at its own start (event time plus the start offset) plus its
    /// duration. The later of the two wins.
    #[must_use]
    pub fn end_time(&self, event_time: f64) -> f64 {
        let hold_end = event_time + self.hold_time.unwrap_or(0.0);
        let slide_end = match self.slide_time {
            Some(slide) => event_time + self.slide_start_time_offset.unwrap_or(0.0) + slide,
            None => event_time,
        };
        hold_end.max(slide_end)
    }
}

/// One notated instant on a track: zero or more simultaneous notes placed at
/// a time, with the tempo and scroll-speed context active there.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoteEvent {
    /// Absolute seconds from the track start.
    pub time: f64,
    /// Horizontal grid coordinate of the notation cell.
    pub x_pos: i32,
    /// Vertical grid coordinate of the notation cell.
    pub y_pos: i32,
    /// The original notation text. [`TERMINATOR_NOTATION`] marks a
    /// synthetic terminator.
    pub raw_notation: String,
    /// Tempo active at this event, in beats per minute.
    pub bpm_at_event: f64,
    /// Scroll-speed multiplier active at this event.
    pub hspeed_at_event: f64,
    /// The simultaneous notes. Empty for terminators and bare tempo markers.
    pub notes: Vec<NoteDetail>,
}

impl NoteEvent {
    /// Whether this event is the synthetic end-of-track marker.
    #[must_use]
    pub fn is_terminator(&self) -> bool {
        self.raw_notation.trim() == TERMINATOR_NOTATION && self.notes.is_empty()
    }

    /// The absolute time the last of this event's notes stops occupying the
    /// timeline. An event without notes ends at its own time.
    #[must_use]
    pub fn end_time(&self) -> f64 {
        self.notes
            .iter()
            .map(|note| note.end_time(self.time))
            .fold(self.time, f64::max)
    }

    /// Builds a terminator event at `time`, copying position, tempo and
    /// scroll-speed context from `reference`.
    #[must_use]
    pub fn terminator(time: f64, reference: &EventContext) -> Self {
        Self {
            time,
            x_pos: reference.x_pos,
            y_pos: reference.y_pos,
            raw_notation: TERMINATOR_NOTATION.to_owned(),
            bpm_at_event: reference.bpm_at_event,
            hspeed_at_event: reference.hspeed_at_event,
            notes: Vec::new(),
        }
    }

    /// The position/tempo/scroll context of this event, for seeding a
    /// synthetic event from it.
    #[must_use]
    pub const fn context(&self) -> EventContext {
        EventContext {
            x_pos: self.x_pos,
            y_pos: self.y_pos,
            bpm_at_event: self.bpm_at_event,
            hspeed_at_event: self.hspeed_at_event,
        }
    }
}

/// A tempo or measure boundary (a comma in the notation). Carries no note
/// content.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimingEvent {
    /// Absolute seconds from the track start.
    pub time: f64,
    /// Tempo active at this boundary, in beats per minute.
    pub bpm_at_event: f64,
    /// Scroll-speed multiplier active at this boundary.
    pub hspeed_at_event: f64,
}

/// Position, tempo and scroll-speed context copied from an existing event
/// when fabricating a synthetic one.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventContext {
    /// Horizontal grid coordinate.
    pub x_pos: i32,
    /// Vertical grid coordinate.
    pub y_pos: i32,
    /// Tempo in beats per minute.
    pub bpm_at_event: f64,
    /// Scroll-speed multiplier.
    pub hspeed_at_event: f64,
}

impl EventContext {
    /// A neutral context: origin cell, the given tempo, unit scroll speed.
    #[must_use]
    pub const fn at_bpm(bpm: f64) -> Self {
        Self {
            x_pos: 0,
            y_pos: 0,
            bpm_at_event: bpm,
            hspeed_at_event: 1.0,
        }
    }
}
