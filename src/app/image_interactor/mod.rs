// Image interactor - Screens one still image

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::model::*;
use crate::error::{ScreenError, ScreenResult};
use crate::ports::FrameScorer;

/// Interactor for the image screening use case
pub struct ImageInteractor {
    frame_scorer: Arc<dyn FrameScorer>,
}

impl ImageInteractor {
    /// Create new image interactor with injected scorer
    pub fn new(frame_scorer: Arc<dyn FrameScorer>) -> Self {
        Self { frame_scorer }
    }

    /// Score an image as a single frame. An unreadable image is `Error`.
    pub async fn check_image(&self, image_path: &Path) -> ScreenResult<Assessment> {
        if !image_path.is_file() {
            return Err(ScreenError::InputNotFound {
                path: image_path.to_string_lossy().to_string(),
            });
        }

        info!("Screening image: {}", image_path.display());
        let frame = match Self::load_frame(image_path.to_path_buf()).await {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Cannot read image {}: {}", image_path.display(), e);
                return Ok(Assessment::from(e));
            }
        };

        let assessment = self.frame_scorer.score_frame(frame).await;
        info!("Image verdict for {}: {}", image_path.display(), assessment.verdict);
        Ok(assessment)
    }

    /// Decode an image file into frame 0 on a blocking thread
    pub async fn load_frame(image_path: PathBuf) -> ScreenResult<Frame> {
        tokio::task::spawn_blocking(move || -> ScreenResult<Frame> {
            let image = image::open(&image_path)?.to_rgb8();
            Ok(Frame::new(0, image))
        })
        .await
        .map_err(|e| ScreenError::decode(format!("image decoding task failed: {}", e)))?
    }
}
