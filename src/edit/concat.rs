//! Splicing one chart after another.

use log::debug;

use crate::chart::event::{EventContext, NoteDetail, NoteEvent, TimingEvent};
use crate::chart::{ChartDocument, DIFFICULTY_SLOTS, Fumen};
use crate::edit::terminator::{ensure_terminator, strip_terminators};
use crate::edit::{EditError, Result};

/// Gaps at or below this many seconds are not worth encoding.
const GAP_THRESHOLD: f64 = 1e-3;

/// Beats in the whole note a tempo-marker segment spans.
const BEATS_PER_MARKER: f64 = 4.0;

/// How the silence between the two songs is written into the chart.
///
/// Both encodings make the chart gap agree with the audio gap; they differ
/// in what the player sees scrolling by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GapPolicy {
    /// One bare tempo marker whose whole note lasts exactly the gap,
    /// closed by a comma at the gap's end.
    #[default]
    TempoMarker,
    /// Whole-beat tap spacers at the reference tempo. A fractional beat of
    /// gap left over is absorbed into the second chart's start offset.
    BeatSpacers,
}

/// The silence to insert between the two songs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gap {
    /// Length of the silence the audio layer also inserts, in seconds.
    pub duration_sec: f64,
    /// How the gap is written into the chart.
    pub policy: GapPolicy,
}

impl Gap {
    /// A gap encoded as a single tempo marker.
    #[must_use]
    pub const fn marker(duration_sec: f64) -> Self {
        Self {
            duration_sec,
            policy: GapPolicy::TempoMarker,
        }
    }

    /// A gap encoded as whole-beat spacer notes.
    #[must_use]
    pub const fn spacers(duration_sec: f64) -> Self {
        Self {
            duration_sec,
            policy: GapPolicy::BeatSpacers,
        }
    }
}

/// Appends `other`'s track for `difficulty` onto `doc`'s, with `gap`'s worth
/// of silence between them.
///
/// The gap is written per [`GapPolicy`], phrased against `reference_bpm`
/// (the tempo context at the end of the first chart). The second chart's
/// events are shifted so its time zero (its lead-in offset) lands right
/// after the gap; its level label is adopted for the slot when it differs
/// from the first chart's. An `other` track without events contributes
/// nothing and the first chart is returned with its terminator restored.
///
/// # Errors
///
/// [`EditError::DifficultyOutOfRange`] for a slot index at or above
/// [`DIFFICULTY_SLOTS`], [`EditError::NegativeGap`] for a negative gap, and
/// [`EditError::NonPositiveBpm`] for an unusable reference tempo. The input
/// documents are left unmodified.
pub fn concatenate(
    doc: &ChartDocument,
    other: &ChartDocument,
    difficulty: usize,
    gap: Gap,
    reference_bpm: f64,
) -> Result<ChartDocument> {
    if difficulty >= DIFFICULTY_SLOTS {
        return Err(EditError::DifficultyOutOfRange(difficulty));
    }
    if gap.duration_sec < 0.0 {
        return Err(EditError::NegativeGap(gap.duration_sec));
    }
    if !reference_bpm.is_finite() || reference_bpm <= 0.0 {
        return Err(EditError::NonPositiveBpm(reference_bpm));
    }

    let mut out = doc.clone();
    let ChartDocument { metadata, tracks } = &mut out;
    let track = &mut tracks[difficulty];
    strip_terminators(track);
    let first_end = track.musical_end_time();
    debug!("concat: first chart's track {difficulty} ends at {first_end:.3}s");

    let source = &other.tracks[difficulty];
    if !source.has_events() {
        debug!("concat: second chart's track {difficulty} is empty, nothing to splice");
        if track.has_content() {
            ensure_terminator(track, metadata);
        }
        return Ok(out);
    }

    let insertion_time = if gap.duration_sec > GAP_THRESHOLD {
        let context = last_note_context(track, reference_bpm);
        match gap.policy {
            GapPolicy::TempoMarker => {
                insert_marker_gap(track, first_end, gap.duration_sec, &context)
            }
            GapPolicy::BeatSpacers => {
                insert_spacer_gap(track, first_end, gap.duration_sec, reference_bpm, &context)
            }
        }
    } else {
        first_end
    };

    let shift = insertion_time - other.metadata.first_offset_sec;
    debug!(
        "concat: second chart starts at {insertion_time:.3}s, events shifted by {shift:.3}s"
    );

    let trailing_lone_terminator = source.timing_events.is_empty()
        && source
            .note_events
            .last()
            .is_some_and(NoteEvent::is_terminator);
    let kept = if trailing_lone_terminator {
        &source.note_events[..source.note_events.len() - 1]
    } else {
        &source.note_events[..]
    };
    for event in kept {
        let mut copy = event.clone();
        copy.time = (copy.time + shift).max(0.0);
        track.note_events.push(copy);
    }
    for event in &source.timing_events {
        let mut copy = event.clone();
        copy.time = (copy.time + shift).max(0.0);
        track.timing_events.push(copy);
    }

    track.sort_events();
    ensure_terminator(track, metadata);

    let adopted_level = if source.level_info.is_empty() {
        other.metadata.level(difficulty).to_owned()
    } else {
        source.level_info.clone()
    };
    if !adopted_level.is_empty() && metadata.levels[difficulty] != adopted_level {
        metadata.levels[difficulty] = adopted_level.clone();
        tracks[difficulty].level_info = adopted_level;
    }

    Ok(out)
}

/// Position/tempo/scroll context of the first chart's last real note, for
/// seeding the gap events.
fn last_note_context(track: &Fumen, reference_bpm: f64) -> EventContext {
    track
        .musical_notes_by_time()
        .last()
        .map_or(EventContext::at_bpm(reference_bpm), NoteEvent::context)
}

/// Writes the gap as one synthetic tempo marker closed by a comma.
///
/// The marker's tempo makes one whole note last exactly the gap, so chart
/// time and audio time stay in agreement across the rest.
fn insert_marker_gap(
    track: &mut Fumen,
    first_end: f64,
    gap_sec: f64,
    context: &EventContext,
) -> f64 {
    let gap_bpm = 60.0 * BEATS_PER_MARKER / gap_sec;
    debug!("concat: gap marker at {first_end:.3}s, synthetic tempo {gap_bpm:.5} BPM");
    track.note_events.push(NoteEvent {
        time: first_end,
        x_pos: context.x_pos,
        y_pos: context.y_pos,
        raw_notation: format!("({gap_bpm:.5}){{1}}"),
        bpm_at_event: gap_bpm,
        hspeed_at_event: context.hspeed_at_event,
        notes: Vec::new(),
    });
    let closing_time = first_end + gap_sec;
    track.timing_events.push(TimingEvent {
        time: closing_time,
        bpm_at_event: gap_bpm,
        hspeed_at_event: context.hspeed_at_event,
    });
    closing_time
}

/// Writes the gap as whole-beat tap spacers at the reference tempo.
///
/// Only whole beats become spacers; the second chart still starts a full
/// `gap_sec` after the first chart's end, so any fractional remainder is
/// carried by the shift alone.
fn insert_spacer_gap(
    track: &mut Fumen,
    first_end: f64,
    gap_sec: f64,
    reference_bpm: f64,
    context: &EventContext,
) -> f64 {
    let beat_duration = 60.0 / reference_bpm;
    let whole_beats = (gap_sec / beat_duration).floor() as usize;
    debug!("concat: {whole_beats} spacer beats of {beat_duration:.3}s fill the {gap_sec:.3}s gap");
    for k in 0..whole_beats {
        let time = first_end + k as f64 * beat_duration;
        track.note_events.push(NoteEvent {
            time,
            x_pos: context.x_pos,
            y_pos: context.y_pos,
            raw_notation: "1".to_owned(),
            bpm_at_event: reference_bpm,
            hspeed_at_event: context.hspeed_at_event,
            notes: vec![NoteDetail::tap()],
        });
        track.timing_events.push(TimingEvent {
            time: time + beat_duration,
            bpm_at_event: reference_bpm,
            hspeed_at_event: context.hspeed_at_event,
        });
    }
    first_end + gap_sec
}
