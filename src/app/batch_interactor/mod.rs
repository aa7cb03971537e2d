// Batch interactor - Screens every media file under a path

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::app::image_interactor::ImageInteractor;
use crate::app::video_interactor::{VideoInteractor, VideoRequest};
use crate::domain::model::*;
use crate::error::ScreenResult;
use crate::utils::path::PathUtils;

/// Interactor for the batch screening use case
pub struct BatchInteractor {
    video_interactor: Arc<VideoInteractor>,
    image_interactor: Arc<ImageInteractor>,
}

impl BatchInteractor {
    pub fn new(
        video_interactor: Arc<VideoInteractor>,
        image_interactor: Arc<ImageInteractor>,
    ) -> Self {
        Self {
            video_interactor,
            image_interactor,
        }
    }

    /// Screen a file or directory, one file at a time, in sorted order.
    ///
    /// Fails only when `input` does not exist; per-file problems are
    /// recorded as `Error` entries.
    pub async fn scan(&self, input: &Path, frames_only: bool) -> ScreenResult<BatchSummary> {
        let assets = PathUtils::discover_media(input)?;
        info!("Scanning {} file(s) under {}", assets.len(), input.display());

        let mut entries = Vec::with_capacity(assets.len());
        for (position, asset) in assets.iter().enumerate() {
            info!(
                "[{}/{}] {}",
                position + 1,
                assets.len(),
                PathUtils::file_label(&asset.path)
            );
            let verdict = self.screen_asset(asset, frames_only).await;
            entries.push(BatchEntry {
                path: asset.display_path(),
                kind: asset.kind,
                verdict,
            });
        }

        let summary = BatchSummary::new(entries);
        info!(
            "Scan finished: {} violated, {} safe, {} errors",
            summary.violated().len(),
            summary.safe().len(),
            summary.errored().len()
        );
        Ok(summary)
    }

    async fn screen_asset(&self, asset: &MediaAsset, frames_only: bool) -> Verdict {
        let outcome = match asset.kind {
            MediaKind::Image => self
                .image_interactor
                .check_image(&asset.path)
                .await
                .map(|assessment| assessment.verdict),
            MediaKind::Video => self
                .video_interactor
                .check_video(VideoRequest::new(&asset.path).frames_only(frames_only))
                .await
                .map(|report| Verdict::from(report.final_verdict)),
            MediaKind::Unsupported => {
                warn!("Unsupported file type: {}", asset.path.display());
                return Verdict::Error;
            }
        };

        outcome.unwrap_or_else(|e| {
            warn!("Screening {} failed: {}", asset.path.display(), e);
            Verdict::Error
        })
    }
}
