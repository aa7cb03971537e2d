// Ports - Interface definitions (contracts)

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::TempDir;

use crate::domain::model::*;
use crate::error::ScreenResult;

/// Port for judging a single image against the image policy
///
/// Implementations never fail: transport and decode problems are reported as
/// `Verdict::Error` in the returned assessment.
#[async_trait]
pub trait FrameScorer: Send + Sync {
    async fn score_frame(&self, frame: Frame) -> Assessment;
}

/// Port for judging a transcript against the text policy
#[async_trait]
pub trait TextScorer: Send + Sync {
    async fn score_text(&self, text: &str) -> Assessment;
}

/// Port for speech-to-text
///
/// Returns an empty string when transcription is not possible.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio_path: &Path) -> String;
}

/// Port for sampling frames out of a video
///
/// An unreadable source yields an empty sequence, not an error.
#[async_trait]
pub trait FrameSource: Send + Sync {
    async fn sample_frames(&self, video_path: &Path, interval_seconds: f64) -> Vec<Frame>;
}

/// Port for isolating the audio track of a video
#[async_trait]
pub trait AudioExtractor: Send + Sync {
    /// Write the audio track as mono 16-bit 16 kHz PCM WAV
    async fn extract_audio(&self, video_path: &Path) -> ScreenResult<ExtractedAudio>;
}

/// An extracted WAV file.
///
/// When backed by a scratch directory the file is removed on drop unless
/// [`ExtractedAudio::keep`] is called.
#[derive(Debug)]
pub struct ExtractedAudio {
    path: PathBuf,
    scratch: Option<TempDir>,
}

impl ExtractedAudio {
    /// Audio file that lives in a scratch directory
    pub fn scratch(path: PathBuf, scratch: TempDir) -> Self {
        Self {
            path,
            scratch: Some(scratch),
        }
    }

    /// Audio file that is left in place
    pub fn persistent(path: PathBuf) -> Self {
        Self {
            path,
            scratch: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Keep the file after this value is dropped, returning its path
    pub fn keep(mut self) -> PathBuf {
        if let Some(dir) = self.scratch.take() {
            let _ = dir.keep();
        }
        self.path.clone()
    }
}
