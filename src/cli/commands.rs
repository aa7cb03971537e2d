//! Command implementations

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::info;

use crate::adapters::TomlConfigAdapter;
use crate::app::{AppContainer, DefaultAppContainer, VideoRequest};
use crate::cli::args::{CheckArgs, ConfigArgs, ScanArgs};
use crate::config_initialization::initialize_configuration_hierarchy;
use crate::domain::model::{MediaKind, Verdict};
use crate::error::ScreenError;
use crate::output::{ReportFormat, ReportRenderer};

/// Exit code for a clean result
pub fn safe_exit() -> ExitCode {
    ExitCode::SUCCESS
}

/// Exit code for a violation or a failed run
pub fn violation_exit() -> ExitCode {
    ExitCode::from(1)
}

/// Execute the check command
pub async fn check(args: CheckArgs, config_path: Option<&Path>) -> Result<ExitCode> {
    info!("Input: {}", args.video.display());

    if !args.video.is_file() {
        anyhow::bail!("Input file does not exist: {}", args.video.display());
    }
    let kind = MediaKind::from_path(&args.video);
    if !kind.is_media() {
        return Err(ScreenError::UnsupportedMedia {
            path: args.video.display().to_string(),
        }
        .into());
    }

    let format: ReportFormat = args.format.parse()?;
    let mut overrides = args.screening.overrides();
    if args.keep_audio {
        overrides.keep_audio = Some(true);
    }
    let config = initialize_configuration_hierarchy(config_path, &overrides)?;
    let container = DefaultAppContainer::new(&config).context("Failed to set up scoring clients")?;

    if kind == MediaKind::Image {
        let assessment = container
            .image_interactor()
            .check_image(&args.video)
            .await
            .context("Failed to screen image")?;
        let image_path = args.video.display().to_string();
        print!(
            "{}",
            ReportRenderer::new(format).render_image(&image_path, &assessment)?
        );
        return Ok(if assessment.verdict == Verdict::Yes {
            violation_exit()
        } else {
            safe_exit()
        });
    }

    let request = VideoRequest::new(&args.video).frames_only(args.frames_only);
    let report = container
        .video_interactor()
        .check_video(request)
        .await
        .context("Failed to screen video")?;

    print!("{}", ReportRenderer::new(format).render_video(&report)?);

    Ok(if report.final_verdict.is_violation() {
        violation_exit()
    } else {
        safe_exit()
    })
}

/// Execute the scan command
pub async fn scan(args: ScanArgs, config_path: Option<&Path>) -> Result<ExitCode> {
    info!("Scan path: {}", args.path.display());

    if !args.path.exists() {
        anyhow::bail!("Path does not exist: {}", args.path.display());
    }

    let format: ReportFormat = args.format.parse()?;
    let config = initialize_configuration_hierarchy(config_path, &args.screening.overrides())?;
    let container = DefaultAppContainer::new(&config).context("Failed to set up scoring clients")?;

    let summary = container
        .batch_interactor()
        .scan(&args.path, args.frames_only)
        .await
        .context("Failed to scan media")?;

    if summary.total() == 0 {
        eprintln!("No media files found in {}", args.path.display());
        return Ok(violation_exit());
    }

    print!("{}", ReportRenderer::new(format).render_batch(&summary)?);

    // a lone unsupported file counts as a failed run
    let only_unsupported = args.path.is_file()
        && summary
            .entries
            .iter()
            .all(|entry| entry.kind == MediaKind::Unsupported);

    Ok(if summary.any_violation() || only_unsupported {
        violation_exit()
    } else {
        safe_exit()
    })
}

/// Execute the config command
pub fn config(args: ConfigArgs, config_path: Option<&Path>) -> Result<ExitCode> {
    let config = initialize_configuration_hierarchy(config_path, &args.screening.overrides())?;
    print!("{}", TomlConfigAdapter::render_redacted(&config)?);
    Ok(safe_exit())
}
