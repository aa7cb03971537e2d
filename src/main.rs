//! AdScreen CLI
//!
//! Screens ad creatives against an advertising policy.
//!
//! # Usage
//!
//! ```bash
//! adscreen check spot.mp4 --mode first-hit
//! adscreen scan ./creatives --threshold 30 --format json
//! adscreen config
//! ```
//!
//! Exit code 0 means nothing was flagged; 1 means a violation was found or
//! the run could not be completed.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use adscreen_cli::cli::{commands, Cli, Commands};
use adscreen_cli::utils::logging::init_logging;

/// Main entry point for the AdScreen CLI application
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_json);

    info!("Starting AdScreen");

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            commands::violation_exit()
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    adscreen_cli::init()?;
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Check(args) => {
            info!("Executing check command");
            commands::check(args, config_path).await
        }
        Commands::Scan(args) => {
            info!("Executing scan command");
            commands::scan(args, config_path).await
        }
        Commands::Config(args) => commands::config(args, config_path),
    }
}
