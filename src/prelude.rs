//! Prelude module for the crate.
//!
//! Re-exports the whole public surface so `use simai_edit::prelude::*;`
//! brings in the model, the transforms and the collaborator seams at once.

pub use crate::chart::{
    ChartDocument, ChartMetadata, DIFFICULTY_SLOTS, Fumen, NoteDetail, NoteEvent,
    TERMINATOR_NOTATION, TimingEvent,
    event::EventContext,
};
pub use crate::edit::{
    CropWindow, EditError, Gap, GapPolicy, concatenate, crop, ensure_terminator, scale,
    strip_terminators,
};
pub use crate::external::{AudioBackend, AudioError, ChartCodec, CodecError, FadeKind};
pub use crate::processor::{ConcatOptions, ProcessError, SongProcessor};
pub use crate::timing::{
    BEATS_PER_WHOLE, DEFAULT_BPM, GRID_SUBDIVISIONS, active_bpm, snap_to_grid, snap_to_grid_with,
};
