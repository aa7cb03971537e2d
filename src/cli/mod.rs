//! CLI module for AdScreen
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

pub use args::{CheckArgs, ConfigArgs, ScanArgs, ScreeningArgs};

/// AdScreen ad creative screener
///
/// Screens video and image ad creatives against an advertising policy using a
/// vision-language model for frames and a speech-to-text service for audio.
#[derive(Parser, Debug)]
#[command(name = "adscreen")]
#[command(about = "AdScreen - screen ad creatives against an advertising policy")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (overridden by RUST_LOG)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Configuration file (default: adscreen.toml or config/adscreen.toml)
    #[arg(long, global = true, env = "ADSCREEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Screen one video file
    Check(CheckArgs),
    /// Screen every image and video under a path
    Scan(ScanArgs),
    /// Print the effective configuration (API key redacted)
    Config(ConfigArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_check() {
        let cli = Cli::try_parse_from([
            "adscreen",
            "--log-level",
            "debug",
            "check",
            "spot.mp4",
            "--mode",
            "first-hit",
            "--workers",
            "10",
            "--keep-audio",
        ])
        .unwrap();

        assert_eq!(cli.log_level, "debug");
        match cli.command {
            Commands::Check(args) => {
                assert_eq!(args.video, PathBuf::from("spot.mp4"));
                assert_eq!(args.screening.mode.as_deref(), Some("first-hit"));
                assert_eq!(args.screening.workers, Some(10));
                assert!(args.keep_audio);
                assert!(!args.frames_only);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_scan_rejects_zero_workers() {
        assert!(Cli::try_parse_from(["adscreen", "scan", "ads/", "--workers", "0"]).is_err());
    }

    #[test]
    fn test_parse_scan() {
        let cli = Cli::try_parse_from([
            "adscreen",
            "scan",
            "ads/",
            "--frames-only",
            "--threshold",
            "40",
            "--format",
            "json",
        ])
        .unwrap();

        match cli.command {
            Commands::Scan(args) => {
                assert!(args.frames_only);
                assert_eq!(args.screening.threshold, Some(40.0));
                assert_eq!(args.format, "json");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
