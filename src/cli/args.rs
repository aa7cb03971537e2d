//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;
use clap_num::number_range;

use crate::config_initialization::ConfigOverrides;

/// Upper bound for `--workers`
pub const MAX_WORKERS: usize = 1000;

fn worker_count(value: &str) -> Result<usize, String> {
    number_range(value, 1, MAX_WORKERS)
}

/// Options shared by the screening commands
#[derive(Args, Debug, Clone, Default)]
pub struct ScreeningArgs {
    /// Seconds between sampled frames
    #[arg(long)]
    pub interval: Option<f64>,

    /// Maximum concurrent scoring calls
    #[arg(long, value_parser = worker_count)]
    pub workers: Option<usize>,

    /// Percentage of valid frames that must be flagged (threshold mode)
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Frame aggregation mode: threshold or first-hit
    #[arg(long)]
    pub mode: Option<String>,
}

impl ScreeningArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            interval_seconds: self.interval,
            workers: self.workers,
            threshold_percent: self.threshold,
            mode: self.mode.clone(),
            keep_audio: None,
        }
    }
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Video (or image) file to screen
    pub video: PathBuf,

    #[command(flatten)]
    pub screening: ScreeningArgs,

    /// Keep the extracted audio file
    #[arg(long)]
    pub keep_audio: bool,

    /// Skip audio extraction and the transcript check
    #[arg(long)]
    pub frames_only: bool,

    /// Report format: text, json or yaml
    #[arg(long, default_value = "text")]
    pub format: String,
}

/// Arguments for the scan command
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// File or directory to screen (directories are walked recursively)
    pub path: PathBuf,

    #[command(flatten)]
    pub screening: ScreeningArgs,

    /// Skip audio extraction and the transcript check for videos
    #[arg(long)]
    pub frames_only: bool,

    /// Report format: text, json or yaml
    #[arg(long, default_value = "text")]
    pub format: String,
}

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub screening: ScreeningArgs,
}
