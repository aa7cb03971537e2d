//! Screening configuration
//!
//! A [`ScreenConfig`] is built once at startup (defaults, then file, then
//! environment, then CLI flags) and handed by value to the adapters. Nothing
//! reads configuration from global state afterwards.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::model::AggregationMode;
use crate::error::{ScreenError, ScreenResult};

pub mod prompts;

pub const DEFAULT_INTERVAL_SECONDS: f64 = 1.0;
pub const DEFAULT_WORKERS: usize = 50;
pub const DEFAULT_THRESHOLD_PERCENT: f64 = 25.0;

/// Complete configuration for a screening run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub vlm: VlmConfig,
    pub transcribe: TranscribeConfig,
    pub prompts: PromptConfig,
    pub sampling: SamplingConfig,
    pub audio: AudioConfig,
}

/// VLM scoring backend (OpenAI-compatible chat completions)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VlmConfig {
    pub url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    /// JPEG quality used when embedding frames (1-100)
    pub jpeg_quality: u8,
}

impl Default for VlmConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8000/v1/chat/completions".to_string(),
            model: "vlm-7b".to_string(),
            api_key: None,
            temperature: 0.1,
            max_tokens: 1500,
            timeout_secs: 30,
            jpeg_quality: 85,
        }
    }
}

impl VlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Speech-to-text backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscribeConfig {
    pub url: String,
    pub timeout_secs: u64,
}

impl Default for TranscribeConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8001/transcribe".to_string(),
            timeout_secs: 60,
        }
    }
}

impl TranscribeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Policy prompts (opaque to the engine)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    pub image: String,
    /// Must contain `{transcript}`, otherwise the transcript is appended
    pub text: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            image: prompts::DEFAULT_IMAGE_PROMPT.to_string(),
            text: prompts::DEFAULT_TEXT_PROMPT.to_string(),
        }
    }
}

/// Frame sampling and aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub interval_seconds: f64,
    pub workers: usize,
    pub threshold_percent: f64,
    /// "threshold" or "first-hit"
    pub mode: String,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            interval_seconds: DEFAULT_INTERVAL_SECONDS,
            workers: DEFAULT_WORKERS,
            threshold_percent: DEFAULT_THRESHOLD_PERCENT,
            mode: "threshold".to_string(),
        }
    }
}

/// Audio extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub ffmpeg_path: String,
    /// Where kept audio files are written (system temp dir when unset)
    pub output_dir: Option<PathBuf>,
    pub keep: bool,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: "ffmpeg".to_string(),
            output_dir: None,
            keep: false,
        }
    }
}

impl ScreenConfig {
    /// Aggregation mode described by the sampling section
    pub fn aggregation_mode(&self) -> ScreenResult<AggregationMode> {
        AggregationMode::parse(&self.sampling.mode, self.sampling.threshold_percent)
    }

    /// Validate value ranges
    pub fn validate(&self) -> ScreenResult<()> {
        let interval = self.sampling.interval_seconds;
        if !interval.is_finite() || interval <= 0.0 {
            return Err(ScreenError::configuration(format!(
                "sampling interval must be a positive number of seconds, got {}",
                interval
            )));
        }

        if self.sampling.workers == 0 {
            return Err(ScreenError::configuration("worker count must be at least 1"));
        }

        self.aggregation_mode()?;

        if self.vlm.url.trim().is_empty() {
            return Err(ScreenError::configuration("VLM url is empty"));
        }
        if self.transcribe.url.trim().is_empty() {
            return Err(ScreenError::configuration("transcribe url is empty"));
        }
        if self.vlm.jpeg_quality == 0 || self.vlm.jpeg_quality > 100 {
            return Err(ScreenError::configuration(format!(
                "jpeg quality must be within 1-100, got {}",
                self.vlm.jpeg_quality
            )));
        }

        Ok(())
    }

    /// Apply `ADSCREEN_*` overrides read through `lookup`.
    ///
    /// Returns the number of overrides applied.
    pub fn apply_env<F>(&mut self, lookup: F) -> ScreenResult<usize>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut applied = 0;

        if let Some(value) = lookup("ADSCREEN_VLM_URL") {
            self.vlm.url = value;
            applied += 1;
        }
        if let Some(value) = lookup("ADSCREEN_VLM_MODEL") {
            self.vlm.model = value;
            applied += 1;
        }
        if let Some(value) = lookup("ADSCREEN_VLM_API_KEY") {
            self.vlm.api_key = Some(value);
            applied += 1;
        }
        if let Some(value) = lookup("ADSCREEN_TRANSCRIBE_URL") {
            self.transcribe.url = value;
            applied += 1;
        }
        if let Some(value) = lookup("ADSCREEN_WORKERS") {
            self.sampling.workers = parse_env("ADSCREEN_WORKERS", &value)?;
            applied += 1;
        }
        if let Some(value) = lookup("ADSCREEN_THRESHOLD") {
            self.sampling.threshold_percent = parse_env("ADSCREEN_THRESHOLD", &value)?;
            applied += 1;
        }
        if let Some(value) = lookup("ADSCREEN_INTERVAL") {
            self.sampling.interval_seconds = parse_env("ADSCREEN_INTERVAL", &value)?;
            applied += 1;
        }
        if let Some(value) = lookup("ADSCREEN_FFMPEG") {
            self.audio.ffmpeg_path = value;
            applied += 1;
        }

        if applied > 0 {
            info!("Applied {} environment variable overrides", applied);
        }
        Ok(applied)
    }
}

fn parse_env<T>(name: &str, value: &str) -> ScreenResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ScreenError::configuration(format!("invalid {} '{}': {}", name, value, e)))
}
