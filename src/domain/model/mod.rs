// Domain models - Core types and data structures

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::error::{ScreenError, ScreenResult};

/// Image extensions recognised by the batch scanner (lowercase, without dot)
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif", "webp", "tiff"];

/// Video extensions recognised by the batch scanner (lowercase, without dot)
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv", "flv", "wmv", "webm", "m4v"];

/// Tri-state classification result for one unit of content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Yes,
    No,
    Error,
}

impl Verdict {
    /// Coerce a free-text model reply into a verdict.
    ///
    /// The reply must begin with "yes" or "no" (case-insensitive, leading
    /// whitespace ignored); anything else is an `Error`.
    pub fn from_reply(reply: &str) -> Self {
        let normalized = reply.trim_start().to_lowercase();
        if normalized.starts_with("yes") {
            Verdict::Yes
        } else if normalized.starts_with("no") {
            Verdict::No
        } else {
            Verdict::Error
        }
    }

    pub fn is_yes(&self) -> bool {
        matches!(self, Verdict::Yes)
    }

    /// Yes or No, as opposed to Error
    pub fn is_valid(&self) -> bool {
        !matches!(self, Verdict::Error)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Yes => "Yes",
            Verdict::No => "No",
            Verdict::Error => "Error",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A verdict together with the raw backend reply, kept for diagnostics only
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub verdict: Verdict,
    pub reply: Option<String>,
}

impl Assessment {
    /// Parse a backend reply into an assessment
    pub fn from_reply(reply: impl Into<String>) -> Self {
        let reply = reply.into();
        Self {
            verdict: Verdict::from_reply(&reply),
            reply: Some(reply),
        }
    }

    /// Failed assessment with a reason
    pub fn error(reason: impl Into<String>) -> Self {
        Self {
            verdict: Verdict::Error,
            reply: Some(reason.into()),
        }
    }

    /// Assessment decided locally without consulting a backend
    pub fn no() -> Self {
        Self {
            verdict: Verdict::No,
            reply: None,
        }
    }
}

impl From<ScreenError> for Assessment {
    fn from(err: ScreenError) -> Self {
        Assessment::error(err.to_string())
    }
}

/// One decoded RGB image sampled from a video (or loaded from an image file)
#[derive(Debug, Clone)]
pub struct Frame {
    /// 0-based position in decode order
    pub index: usize,
    pub image: RgbImage,
}

impl Frame {
    pub fn new(index: usize, image: RgbImage) -> Self {
        Self { index, image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Media kind derived from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MediaKind {
    Image,
    Video,
    Unsupported,
}

impl MediaKind {
    /// Classify a path by its (case-insensitive) extension
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase());

        match extension.as_deref() {
            Some(ext) if IMAGE_EXTENSIONS.contains(&ext) => MediaKind::Image,
            Some(ext) if VIDEO_EXTENSIONS.contains(&ext) => MediaKind::Video,
            _ => MediaKind::Unsupported,
        }
    }

    pub fn is_media(&self) -> bool {
        !matches!(self, MediaKind::Unsupported)
    }
}

/// One input file scheduled for screening
#[derive(Debug, Clone, PartialEq)]
pub struct MediaAsset {
    pub path: PathBuf,
    pub kind: MediaKind,
}

impl MediaAsset {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let kind = MediaKind::from_path(&path);
        Self { path, kind }
    }

    pub fn display_path(&self) -> String {
        self.path.to_string_lossy().to_string()
    }
}

/// Minimum share of valid frames that must be Yes to flag a video
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdPolicy {
    percent: f64,
}

impl ThresholdPolicy {
    /// Create a policy, rejecting values outside `[0, 100]`
    pub fn new(percent: f64) -> ScreenResult<Self> {
        if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
            return Err(ScreenError::configuration(format!(
                "threshold must be within 0-100, got {}",
                percent
            )));
        }
        Ok(Self { percent })
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }

    /// `100 * yes / valid >= percent`, compared without dividing.
    ///
    /// Returns false when there are no valid frames.
    pub fn is_met(&self, yes_count: usize, valid: usize) -> bool {
        if valid == 0 {
            return false;
        }
        100.0 * yes_count as f64 >= self.percent * valid as f64
    }
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self { percent: 25.0 }
    }
}

/// How per-frame verdicts are reduced to a single verdict
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum AggregationMode {
    /// Stop at the first Yes frame
    FirstHit,
    /// Score every frame and compare the Yes share against a threshold
    Threshold(ThresholdPolicy),
}

impl AggregationMode {
    /// Parse a mode name ("first-hit" or "threshold")
    pub fn parse(mode: &str, threshold_percent: f64) -> ScreenResult<Self> {
        match mode.trim().to_lowercase().as_str() {
            "first-hit" | "first_hit" | "firsthit" | "early-exit" => Ok(AggregationMode::FirstHit),
            "threshold" | "percentage" => Ok(AggregationMode::Threshold(ThresholdPolicy::new(
                threshold_percent,
            )?)),
            other => Err(ScreenError::configuration(format!(
                "invalid aggregation mode '{}'. Valid modes: threshold, first-hit",
                other
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AggregationMode::FirstHit => "first-hit",
            AggregationMode::Threshold(_) => "threshold",
        }
    }
}

impl Default for AggregationMode {
    fn default() -> Self {
        AggregationMode::Threshold(ThresholdPolicy::default())
    }
}

/// Running count of frame results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FrameTally {
    total: usize,
    valid: usize,
    yes_count: usize,
}

impl FrameTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one completed frame
    pub fn record(&mut self, verdict: Verdict) {
        self.total += 1;
        match verdict {
            Verdict::Yes => {
                self.valid += 1;
                self.yes_count += 1;
            }
            Verdict::No => self.valid += 1,
            Verdict::Error => {}
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn valid(&self) -> usize {
        self.valid
    }

    pub fn yes_count(&self) -> usize {
        self.yes_count
    }

    pub fn errors(&self) -> usize {
        self.total - self.valid
    }

    /// Share of valid frames that were Yes, `None` without valid frames
    pub fn percentage(&self) -> Option<f64> {
        if self.valid == 0 {
            None
        } else {
            Some(self.yes_count as f64 / self.valid as f64 * 100.0)
        }
    }
}

/// Outcome of evaluating a set of frames
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    pub verdict: Verdict,
    pub mode: AggregationMode,
    pub tally: FrameTally,
    /// Frames handed to the evaluator
    pub dispatched: usize,
    /// Index of the frame that ended a first-hit run
    pub first_hit: Option<usize>,
}

impl FrameReport {
    /// Report for an empty frame sequence
    pub fn empty(mode: AggregationMode) -> Self {
        Self {
            verdict: Verdict::No,
            mode,
            tally: FrameTally::new(),
            dispatched: 0,
            first_hit: None,
        }
    }

    /// Frames whose results were never counted (abandoned after a first hit)
    pub fn abandoned(&self) -> usize {
        self.dispatched.saturating_sub(self.tally.total())
    }
}

/// Combined decision over the text and frame verdicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FinalVerdict {
    Yes,
    No,
}

impl FinalVerdict {
    pub fn is_violation(&self) -> bool {
        matches!(self, FinalVerdict::Yes)
    }
}

impl From<FinalVerdict> for Verdict {
    fn from(value: FinalVerdict) -> Self {
        match value {
            FinalVerdict::Yes => Verdict::Yes,
            FinalVerdict::No => Verdict::No,
        }
    }
}

impl fmt::Display for FinalVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinalVerdict::Yes => f.write_str("Yes"),
            FinalVerdict::No => f.write_str("No"),
        }
    }
}

/// One row of a batch run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchEntry {
    pub path: String,
    pub kind: MediaKind,
    pub verdict: Verdict,
}

/// Results of a batch run, in scan order
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub generated_at: DateTime<Utc>,
    pub entries: Vec<BatchEntry>,
}

impl BatchSummary {
    pub fn new(entries: Vec<BatchEntry>) -> Self {
        Self {
            generated_at: Utc::now(),
            entries,
        }
    }

    pub fn total(&self) -> usize {
        self.entries.len()
    }

    pub fn violated(&self) -> Vec<&BatchEntry> {
        self.with_verdict(Verdict::Yes)
    }

    pub fn safe(&self) -> Vec<&BatchEntry> {
        self.with_verdict(Verdict::No)
    }

    pub fn errored(&self) -> Vec<&BatchEntry> {
        self.with_verdict(Verdict::Error)
    }

    pub fn any_violation(&self) -> bool {
        self.entries.iter().any(|entry| entry.verdict.is_yes())
    }

    fn with_verdict(&self, verdict: Verdict) -> Vec<&BatchEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.verdict == verdict)
            .collect()
    }
}
