//! AdScreen Library
//!
//! Screens video and image ad creatives against an advertising policy.
//! Frames are sampled at a fixed interval and judged concurrently by a
//! vision-language model; the audio track is transcribed and judged as
//! text. A creative violates the policy when either judgement says so.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config;
pub mod config_initialization;
pub mod domain;
pub mod engine;
pub mod error;
pub mod output;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use config::ScreenConfig;
pub use domain::model::{
    AggregationMode, Assessment, BatchSummary, FinalVerdict, Frame, FrameReport, FrameTally,
    MediaKind, ThresholdPolicy, Verdict,
};
pub use domain::rules::VerdictRules;
pub use engine::{FrameEvaluator, TextEvaluator};
pub use error::{ScreenError, ScreenResult};

/// Initialize AdScreen library
pub fn init() -> ScreenResult<()> {
    ffmpeg_next::init()?;
    Ok(())
}
