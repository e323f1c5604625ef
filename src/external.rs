//! Seams to the chart-text and audio collaborators.
//!
//! The engine never parses simai notation or touches audio bytes itself.
//! Callers plug concrete implementations of [`ChartCodec`] and
//! [`AudioBackend`] (typically wrapping an external parser library and an
//! ffmpeg-style tool) into [`crate::processor::SongProcessor`]. Both seams
//! report failure through explicit error values; a collaborator that cannot
//! do its job must never hand back an empty document pretending to be
//! valid.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::chart::ChartDocument;

/// A failure at the chart parse/serialize boundary.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CodecError {
    /// The chart text could not be parsed into the event model.
    #[error("malformed chart text: {0}")]
    Malformed(String),
    /// The document could not be rendered back to chart text.
    #[error("chart cannot be serialized: {0}")]
    Unserializable(String),
}

/// A failure in the audio collaborator.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AudioError {
    /// The backend tool reported an error.
    #[error("audio backend failed: {0}")]
    Backend(String),
    /// A file could not be read or written.
    #[error("audio io: {0}")]
    Io(#[from] std::io::Error),
}

/// Direction of a fade applied to an audio file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeKind {
    /// Fade in from silence at the start.
    In,
    /// Fade out to silence at the end.
    Out,
}

/// Parses simai text into the event model and serializes it back.
pub trait ChartCodec {
    /// Parses chart text into a document.
    ///
    /// # Errors
    ///
    /// [`CodecError::Malformed`] when the text is not a chart.
    fn parse(&self, text: &str) -> Result<ChartDocument, CodecError>;

    /// Renders a document back to chart text.
    ///
    /// # Errors
    ///
    /// [`CodecError::Unserializable`] when the document cannot be rendered.
    fn serialize(&self, chart: &ChartDocument) -> Result<String, CodecError>;
}

/// Physical audio operations the paired track needs.
///
/// All operations read `input` and write `output` without touching the
/// input file.
pub trait AudioBackend {
    /// Crops `input` to `[start_sec, end_sec]`.
    ///
    /// # Errors
    ///
    /// [`AudioError`] when the backend fails.
    fn crop(&self, input: &Path, output: &Path, start_sec: f64, end_sec: f64)
    -> Result<(), AudioError>;

    /// Rescales `input` in time by `factor` (above 1 shortens it).
    ///
    /// # Errors
    ///
    /// [`AudioError`] when the backend fails.
    fn rescale(&self, input: &Path, output: &Path, factor: f64) -> Result<(), AudioError>;

    /// Applies a fade of `duration_sec` at the relevant end of `input`.
    ///
    /// # Errors
    ///
    /// [`AudioError`] when the backend fails.
    fn fade(
        &self,
        input: &Path,
        output: &Path,
        kind: FadeKind,
        duration_sec: f64,
    ) -> Result<(), AudioError>;

    /// Concatenates `inputs` in order into `output`.
    ///
    /// # Errors
    ///
    /// [`AudioError`] when the backend fails.
    fn concat_files(&self, inputs: &[PathBuf], output: &Path) -> Result<(), AudioError>;

    /// Writes `duration_sec` of silence to `output`.
    ///
    /// # Errors
    ///
    /// [`AudioError`] when the backend fails.
    fn silence(&self, output: &Path, duration_sec: f64) -> Result<(), AudioError>;

    /// The duration of the audio file at `path`, in seconds.
    ///
    /// # Errors
    ///
    /// [`AudioError`] when the file cannot be probed.
    fn duration(&self, path: &Path) -> Result<f64, AudioError>;
}
