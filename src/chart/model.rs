//! The top-level chart document.

use crate::chart::fumen::Fumen;
use crate::chart::metadata::ChartMetadata;
use crate::edit::terminator::ensure_terminator;

/// Number of difficulty slots a simai chart carries.
pub const DIFFICULTY_SLOTS: usize = 7;

/// One parsed chart: chart-wide metadata plus a fixed array of seven
/// difficulty tracks.
///
/// The track array always has [`DIFFICULTY_SLOTS`] entries; an unused slot
/// is an empty [`Fumen`] rather than a missing one, so transforms never deal
/// with absent slots.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChartDocument {
    /// The chart-wide header.
    pub metadata: ChartMetadata,
    /// The difficulty tracks, indexed by difficulty slot.
    pub tracks: [Fumen; DIFFICULTY_SLOTS],
}

impl Default for ChartDocument {
    fn default() -> Self {
        Self {
            metadata: ChartMetadata::default(),
            tracks: std::array::from_fn(Fumen::new),
        }
    }
}

impl ChartDocument {
    /// An empty document with the given metadata.
    #[must_use]
    pub fn with_metadata(metadata: ChartMetadata) -> Self {
        Self {
            metadata,
            tracks: std::array::from_fn(Fumen::new),
        }
    }

    /// The track in a difficulty slot, or `None` when the index is out of
    /// range.
    #[must_use]
    pub fn track(&self, difficulty: usize) -> Option<&Fumen> {
        self.tracks.get(difficulty)
    }

    /// Indices of the slots that carry musical content or a level label,
    /// from either the track itself or the metadata.
    #[must_use]
    pub fn active_slots(&self) -> Vec<usize> {
        (0..DIFFICULTY_SLOTS)
            .filter(|&i| self.tracks[i].has_content() || !self.metadata.level(i).is_empty())
            .collect()
    }

    /// Normalizes the document for serialization: fills each track's level
    /// label from the metadata when the track has none, and restores the
    /// single terminator marker on every content-bearing track.
    pub fn finalize(&mut self) {
        let Self { metadata, tracks } = self;
        for (i, track) in tracks.iter_mut().enumerate() {
            if track.level_info.is_empty() && !metadata.level(i).is_empty() {
                track.level_info = metadata.level(i).to_owned();
            }
            if track.has_content() {
                ensure_terminator(track, metadata);
            }
        }
    }
}
