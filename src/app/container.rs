use std::sync::Arc;

use crate::adapters::{
    AudioFfmpegAdapter, SamplerLibavAdapter, TranscribeHttpAdapter, VlmHttpAdapter,
};
use crate::app::{
    batch_interactor::BatchInteractor, image_interactor::ImageInteractor,
    video_interactor::VideoInteractor,
};
use crate::config::ScreenConfig;
use crate::engine::{FrameEvaluator, TextEvaluator};
use crate::error::ScreenResult;
use crate::ports::{AudioExtractor, FrameScorer, FrameSource, TextScorer, Transcriber};

pub trait AppContainer: Send + Sync {
    fn video_interactor(&self) -> Arc<VideoInteractor>;
    fn image_interactor(&self) -> Arc<ImageInteractor>;
    fn batch_interactor(&self) -> Arc<BatchInteractor>;
}

pub struct DefaultAppContainer {
    video_interactor: Arc<VideoInteractor>,
    image_interactor: Arc<ImageInteractor>,
    batch_interactor: Arc<BatchInteractor>,
}

impl DefaultAppContainer {
    /// Wire the production adapters from a validated configuration
    pub fn new(config: &ScreenConfig) -> ScreenResult<Self> {
        let vlm = Arc::new(VlmHttpAdapter::new(config.vlm.clone(), config.prompts.clone())?);
        let transcriber = Arc::new(TranscribeHttpAdapter::new(&config.transcribe)?);
        let sampler = Arc::new(SamplerLibavAdapter::new());
        let audio = Arc::new(AudioFfmpegAdapter::new(&config.audio));

        let frame_evaluator = Arc::new(FrameEvaluator::new(
            Arc::clone(&vlm) as Arc<dyn FrameScorer>,
            config.sampling.workers,
            config.aggregation_mode()?,
        ));
        let text_evaluator = Arc::new(TextEvaluator::new(Arc::clone(&vlm) as Arc<dyn TextScorer>));

        let video_interactor = Arc::new(
            VideoInteractor::new(
                sampler as Arc<dyn FrameSource>,
                audio as Arc<dyn AudioExtractor>,
                transcriber as Arc<dyn Transcriber>,
                frame_evaluator,
                text_evaluator,
                config.sampling.interval_seconds,
            )
            .with_keep_audio(config.audio.keep),
        );

        let image_interactor = Arc::new(ImageInteractor::new(vlm as Arc<dyn FrameScorer>));

        let batch_interactor = Arc::new(BatchInteractor::new(
            Arc::clone(&video_interactor),
            Arc::clone(&image_interactor),
        ));

        Ok(Self {
            video_interactor,
            image_interactor,
            batch_interactor,
        })
    }
}

impl AppContainer for DefaultAppContainer {
    fn video_interactor(&self) -> Arc<VideoInteractor> {
        Arc::clone(&self.video_interactor)
    }

    fn image_interactor(&self) -> Arc<ImageInteractor> {
        Arc::clone(&self.image_interactor)
    }

    fn batch_interactor(&self) -> Arc<BatchInteractor> {
        Arc::clone(&self.batch_interactor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_builds_from_defaults() {
        let container = DefaultAppContainer::new(&ScreenConfig::default()).unwrap();
        let _ = container.video_interactor();
        let _ = container.image_interactor();
        let _ = container.batch_interactor();
    }

    #[test]
    fn test_container_rejects_bad_mode() {
        let mut config = ScreenConfig::default();
        config.sampling.mode = "sometimes".to_string();
        assert!(DefaultAppContainer::new(&config).is_err());
    }
}
