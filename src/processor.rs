//! Orchestration of paired audio and chart edits.

use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use thiserror::Error;

use crate::chart::ChartDocument;
use crate::edit::{self, CropWindow, EditError, Gap};
use crate::external::{AudioBackend, AudioError, ChartCodec, CodecError, FadeKind};
use crate::timing::{DEFAULT_BPM, active_bpm, snap_to_grid};

/// A failure while editing a song pair.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The chart codec failed.
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// The audio backend failed.
    #[error(transparent)]
    Audio(#[from] AudioError),
    /// A chart transform rejected its arguments.
    #[error(transparent)]
    Edit(#[from] EditError),
    /// A chart file could not be read or written.
    #[error("chart io: {0}")]
    Io(#[from] std::io::Error),
}

/// Options for [`SongProcessor::concatenate_with`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConcatOptions {
    /// The difficulty slot to splice.
    pub difficulty: usize,
    /// The silence between the songs and how the chart encodes it.
    pub gap: Gap,
    /// Fade-out applied to the end of the first song, seconds. Zero skips.
    pub fade_out_sec: f64,
    /// Fade-in applied to the start of the second song, seconds. Zero skips.
    pub fade_in_sec: f64,
}

impl ConcatOptions {
    /// Splice `difficulty` with `gap` and no fades.
    #[must_use]
    pub const fn new(difficulty: usize, gap: Gap) -> Self {
        Self {
            difficulty,
            gap,
            fade_out_sec: 0.0,
            fade_in_sec: 0.0,
        }
    }
}

/// Edits one song+chart pair as a unit, keeping both sides synchronized.
///
/// Holds the chart in memory and the audio as a file path; every operation
/// writes fresh output files and re-points the processor at them, so a chain
/// of edits never destroys its inputs.
#[derive(Debug)]
pub struct SongProcessor<C, A> {
    codec: C,
    audio: A,
    chart: ChartDocument,
    audio_path: PathBuf,
    scratch_dir: PathBuf,
}

impl<C: ChartCodec, A: AudioBackend> SongProcessor<C, A> {
    /// Loads a song pair: reads and parses the chart file, records the audio
    /// path.
    ///
    /// # Errors
    ///
    /// [`ProcessError::Io`] when the chart file cannot be read,
    /// [`ProcessError::Codec`] when it does not parse.
    pub fn open(
        codec: C,
        audio: A,
        audio_path: impl Into<PathBuf>,
        chart_path: &Path,
    ) -> Result<Self, ProcessError> {
        let text = std::fs::read_to_string(chart_path)?;
        let chart = codec.parse(&text)?;
        let audio_path = audio_path.into();
        info!("opened song pair: audio {}", audio_path.display());
        Ok(Self {
            codec,
            audio,
            chart,
            audio_path,
            scratch_dir: std::env::temp_dir(),
        })
    }

    /// Uses `dir` for intermediate audio files (fades, silence).
    #[must_use]
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    /// The current chart document.
    #[must_use]
    pub const fn chart(&self) -> &ChartDocument {
        &self.chart
    }

    /// The current audio file path.
    #[must_use]
    pub fn audio_path(&self) -> &Path {
        &self.audio_path
    }

    /// Crops audio and chart to `[start_sec, end_sec]`, snapping both edges
    /// to the chart's tempo grid so the pair stays aligned.
    ///
    /// # Errors
    ///
    /// Any [`ProcessError`] from the audio backend, the crop transform, or
    /// writing the chart file.
    pub fn crop(
        &mut self,
        out_audio: &Path,
        out_chart: &Path,
        start_sec: f64,
        end_sec: f64,
        tracks: Option<&[usize]>,
    ) -> Result<&mut Self, ProcessError> {
        let snapped_start = snap_to_grid(start_sec, self.bpm_near(start_sec));
        let snapped_end = snap_to_grid(end_sec, self.bpm_near(end_sec));
        debug!("audio crop window snapped to [{snapped_start:.6}, {snapped_end:.6}]s");
        self.audio
            .crop(&self.audio_path, out_audio, snapped_start, snapped_end)?;

        self.chart = edit::crop(&self.chart, CropWindow::new(start_sec, end_sec), tracks)?;
        self.save_chart(out_chart)?;
        self.audio_path = out_audio.to_owned();
        Ok(self)
    }

    /// Accelerates (or decelerates) audio and chart by `factor`.
    ///
    /// # Errors
    ///
    /// Any [`ProcessError`] from the audio backend, the scale transform, or
    /// writing the chart file.
    pub fn accelerate(
        &mut self,
        out_audio: &Path,
        out_chart: &Path,
        factor: f64,
    ) -> Result<&mut Self, ProcessError> {
        self.audio.rescale(&self.audio_path, out_audio, factor)?;
        self.chart = edit::scale(&self.chart, factor)?;
        self.save_chart(out_chart)?;
        self.audio_path = out_audio.to_owned();
        Ok(self)
    }

    /// Appends `other` after this song with the configured gap and fades.
    ///
    /// The chart gap is phrased against the tempo active at the end of this
    /// chart's target track; the same gap length is written into the audio
    /// as silence, so both timelines agree.
    ///
    /// # Errors
    ///
    /// Any [`ProcessError`] from the audio backend, the concatenation
    /// transform, or writing the chart file.
    pub fn concatenate_with(
        &mut self,
        other: &Self,
        out_audio: &Path,
        out_chart: &Path,
        options: &ConcatOptions,
    ) -> Result<&mut Self, ProcessError> {
        let reference_bpm = self.bpm_at_track_end(options.difficulty);

        let mut segments: Vec<PathBuf> = Vec::with_capacity(3);
        let first = if options.fade_out_sec > 0.0 {
            let faded = self.scratch_dir.join("simai-edit-fade-out.wav");
            self.audio
                .fade(&self.audio_path, &faded, FadeKind::Out, options.fade_out_sec)?;
            faded
        } else {
            self.audio_path.clone()
        };
        segments.push(first);

        if options.gap.duration_sec > 1e-3 {
            let silence = self.scratch_dir.join("simai-edit-gap-silence.wav");
            self.audio.silence(&silence, options.gap.duration_sec)?;
            segments.push(silence);
        }

        let second = if options.fade_in_sec > 0.0 {
            let faded = self.scratch_dir.join("simai-edit-fade-in.wav");
            self.audio
                .fade(&other.audio_path, &faded, FadeKind::In, options.fade_in_sec)?;
            faded
        } else {
            other.audio_path.clone()
        };
        segments.push(second);

        self.audio.concat_files(&segments, out_audio)?;

        self.chart = edit::concatenate(
            &self.chart,
            &other.chart,
            options.difficulty,
            options.gap,
            reference_bpm,
        )?;
        self.save_chart(out_chart)?;
        self.audio_path = out_audio.to_owned();
        Ok(self)
    }

    /// Normalizes the chart (levels, terminators) and writes it to `path`.
    ///
    /// # Errors
    ///
    /// [`ProcessError::Codec`] when serialization fails,
    /// [`ProcessError::Io`] when the file cannot be written.
    pub fn save_chart(&self, path: &Path) -> Result<(), ProcessError> {
        let mut doc = self.chart.clone();
        doc.finalize();
        let text = self.codec.serialize(&doc)?;
        std::fs::write(path, text)?;
        info!("chart written to {}", path.display());
        Ok(())
    }

    /// Tempo near `at` seconds: the first track with events decides,
    /// falling back to the chart-wide tempo.
    fn bpm_near(&self, at: f64) -> f64 {
        let fallback = self.chart.metadata.fallback_bpm();
        self.chart
            .tracks
            .iter()
            .find(|track| track.has_events())
            .map_or(fallback, |track| active_bpm(track, at, fallback))
    }

    /// Tempo active at the musical end of a difficulty track.
    fn bpm_at_track_end(&self, difficulty: usize) -> f64 {
        let fallback = self.chart.metadata.fallback_bpm();
        let bpm = match self.chart.track(difficulty) {
            Some(track) if track.has_events() => {
                active_bpm(track, track.musical_end_time(), fallback)
            }
            _ => self.bpm_near(0.0),
        };
        if bpm > 0.0 {
            bpm
        } else {
            warn!("no usable tempo at the first chart's end, assuming {DEFAULT_BPM} BPM");
            DEFAULT_BPM
        }
    }
}
