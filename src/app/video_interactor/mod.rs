// Video interactor - Screens one video file

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};

use crate::domain::model::*;
use crate::domain::rules::VerdictRules;
use crate::engine::{FrameEvaluator, TextEvaluator};
use crate::error::{ScreenError, ScreenResult};
use crate::ports::*;

/// Request to screen one video
#[derive(Debug, Clone)]
pub struct VideoRequest {
    pub video_path: PathBuf,
    /// Skip audio extraction and the text check
    pub frames_only: bool,
}

impl VideoRequest {
    pub fn new(video_path: impl Into<PathBuf>) -> Self {
        Self {
            video_path: video_path.into(),
            frames_only: false,
        }
    }

    pub fn frames_only(mut self, frames_only: bool) -> Self {
        self.frames_only = frames_only;
        self
    }
}

/// Outcome of screening one video
#[derive(Debug, Clone, Serialize)]
pub struct VideoReport {
    pub video_path: String,
    pub text: Assessment,
    pub frames: FrameReport,
    pub final_verdict: FinalVerdict,
    pub transcript_chars: usize,
    /// Set when the extracted audio was kept on disk
    pub kept_audio: Option<PathBuf>,
    pub elapsed_secs: f64,
}

/// Result of the audio/text branch
struct TextOutcome {
    assessment: Assessment,
    transcript_chars: usize,
    kept_audio: Option<PathBuf>,
}

impl TextOutcome {
    fn skipped() -> Self {
        Self {
            assessment: Assessment::no(),
            transcript_chars: 0,
            kept_audio: None,
        }
    }
}

/// Interactor for the video screening use case
pub struct VideoInteractor {
    frame_source: Arc<dyn FrameSource>,
    audio_extractor: Arc<dyn AudioExtractor>,
    transcriber: Arc<dyn Transcriber>,
    frame_evaluator: Arc<FrameEvaluator>,
    text_evaluator: Arc<TextEvaluator>,
    interval_seconds: f64,
    keep_audio: bool,
}

impl VideoInteractor {
    /// Create new video interactor with injected ports
    pub fn new(
        frame_source: Arc<dyn FrameSource>,
        audio_extractor: Arc<dyn AudioExtractor>,
        transcriber: Arc<dyn Transcriber>,
        frame_evaluator: Arc<FrameEvaluator>,
        text_evaluator: Arc<TextEvaluator>,
        interval_seconds: f64,
    ) -> Self {
        Self {
            frame_source,
            audio_extractor,
            transcriber,
            frame_evaluator,
            text_evaluator,
            interval_seconds,
            keep_audio: false,
        }
    }

    /// Keep the extracted audio file instead of deleting it
    pub fn with_keep_audio(mut self, keep_audio: bool) -> Self {
        self.keep_audio = keep_audio;
        self
    }

    /// Screen a video: the text and frame branches run concurrently and
    /// their verdicts are OR-ed
    pub async fn check_video(&self, request: VideoRequest) -> ScreenResult<VideoReport> {
        let video_path = request.video_path.as_path();
        if !video_path.is_file() {
            return Err(ScreenError::InputNotFound {
                path: video_path.to_string_lossy().to_string(),
            });
        }

        let started = Instant::now();
        info!("Screening video: {}", video_path.display());

        let text_branch = async {
            if request.frames_only {
                info!("Frames-only run, skipping audio");
                TextOutcome::skipped()
            } else {
                self.run_text_branch(video_path).await
            }
        };
        let frame_branch = async {
            let frames = self
                .frame_source
                .sample_frames(video_path, self.interval_seconds)
                .await;
            self.frame_evaluator.evaluate(frames).await
        };

        let (text, frames) = tokio::join!(text_branch, frame_branch);

        let final_verdict = VerdictRules::combine(text.assessment.verdict, frames.verdict);
        info!(
            "Final verdict for {}: {} (text: {}, frames: {})",
            video_path.display(),
            final_verdict,
            text.assessment.verdict,
            frames.verdict
        );

        Ok(VideoReport {
            video_path: video_path.to_string_lossy().to_string(),
            text: text.assessment,
            frames,
            final_verdict,
            transcript_chars: text.transcript_chars,
            kept_audio: text.kept_audio,
            elapsed_secs: started.elapsed().as_secs_f64(),
        })
    }

    /// Extract audio, transcribe it and judge the transcript.
    ///
    /// Extraction failure skips the text check.
    async fn run_text_branch(&self, video_path: &Path) -> TextOutcome {
        let audio = match self.audio_extractor.extract_audio(video_path).await {
            Ok(audio) => audio,
            Err(e) => {
                warn!("Audio extraction failed, skipping text check: {}", e);
                return TextOutcome::skipped();
            }
        };

        let transcript = self.transcriber.transcribe(audio.path()).await;
        let kept_audio = if self.keep_audio {
            let path = audio.keep();
            info!("Audio kept at {}", path.display());
            Some(path)
        } else {
            None
        };

        let assessment = self.text_evaluator.evaluate(&transcript).await;
        TextOutcome {
            assessment,
            transcript_chars: transcript.chars().count(),
            kept_audio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use image::RgbImage;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct StubSource {
        count: usize,
    }

    #[async_trait]
    impl FrameSource for StubSource {
        async fn sample_frames(&self, _video_path: &Path, _interval: f64) -> Vec<Frame> {
            (0..self.count)
                .map(|i| Frame::new(i * 30, RgbImage::new(2, 2)))
                .collect()
        }
    }

    struct StubAudio {
        fail: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AudioExtractor for StubAudio {
        async fn extract_audio(&self, video_path: &Path) -> ScreenResult<ExtractedAudio> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ScreenError::ToolUnavailable {
                    tool: "ffmpeg".to_string(),
                });
            }
            let dir = tempfile::tempdir()?;
            let path = dir.path().join("clip_audio.wav");
            std::fs::write(&path, video_path.to_string_lossy().as_bytes())?;
            Ok(ExtractedAudio::scratch(path, dir))
        }
    }

    struct StubTranscriber(&'static str);

    #[async_trait]
    impl Transcriber for StubTranscriber {
        async fn transcribe(&self, _audio_path: &Path) -> String {
            self.0.to_string()
        }
    }

    struct FixedFrames(&'static str);

    #[async_trait]
    impl FrameScorer for FixedFrames {
        async fn score_frame(&self, _frame: Frame) -> Assessment {
            Assessment::from_reply(self.0)
        }
    }

    struct FixedText(&'static str);

    #[async_trait]
    impl TextScorer for FixedText {
        async fn score_text(&self, _text: &str) -> Assessment {
            Assessment::from_reply(self.0)
        }
    }

    struct Setup {
        frame_reply: &'static str,
        text_reply: &'static str,
        transcript: &'static str,
        audio_fails: bool,
    }

    impl Setup {
        fn build(self) -> (VideoInteractor, Arc<StubAudio>) {
            let audio = Arc::new(StubAudio {
                fail: self.audio_fails,
                calls: AtomicUsize::new(0),
            });
            let interactor = VideoInteractor::new(
                Arc::new(StubSource { count: 4 }),
                audio.clone(),
                Arc::new(StubTranscriber(self.transcript)),
                Arc::new(FrameEvaluator::new(
                    Arc::new(FixedFrames(self.frame_reply)),
                    2,
                    AggregationMode::default(),
                )),
                Arc::new(TextEvaluator::new(Arc::new(FixedText(self.text_reply)))),
                1.0,
            );
            (interactor, audio)
        }
    }

    fn video_file(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, b"video").unwrap();
        path
    }

    #[tokio::test]
    async fn test_text_violation_flags_video() {
        let dir = TempDir::new().unwrap();
        let (interactor, _) = Setup {
            frame_reply: "No",
            text_reply: "Yes, gambling promotion",
            transcript: "bet now and win",
            audio_fails: false,
        }
        .build();

        let report = interactor
            .check_video(VideoRequest::new(video_file(&dir)))
            .await
            .unwrap();
        assert_eq!(report.text.verdict, Verdict::Yes);
        assert_eq!(report.frames.verdict, Verdict::No);
        assert_eq!(report.final_verdict, FinalVerdict::Yes);
        assert_eq!(report.transcript_chars, 15);
        assert!(report.kept_audio.is_none());
    }

    #[tokio::test]
    async fn test_frame_violation_flags_video() {
        let dir = TempDir::new().unwrap();
        let (interactor, _) = Setup {
            frame_reply: "yes",
            text_reply: "No",
            transcript: "hello",
            audio_fails: false,
        }
        .build();

        let report = interactor
            .check_video(VideoRequest::new(video_file(&dir)))
            .await
            .unwrap();
        assert_eq!(report.frames.verdict, Verdict::Yes);
        assert_eq!(report.final_verdict, FinalVerdict::Yes);
    }

    #[tokio::test]
    async fn test_audio_failure_skips_text() {
        let dir = TempDir::new().unwrap();
        let (interactor, _) = Setup {
            frame_reply: "No",
            text_reply: "Yes",
            transcript: "ignored",
            audio_fails: true,
        }
        .build();

        let report = interactor
            .check_video(VideoRequest::new(video_file(&dir)))
            .await
            .unwrap();
        assert_eq!(report.text.verdict, Verdict::No);
        assert_eq!(report.final_verdict, FinalVerdict::No);
    }

    #[tokio::test]
    async fn test_frames_only_never_touches_audio() {
        let dir = TempDir::new().unwrap();
        let (interactor, audio) = Setup {
            frame_reply: "No",
            text_reply: "Yes",
            transcript: "would flag",
            audio_fails: false,
        }
        .build();

        let report = interactor
            .check_video(VideoRequest::new(video_file(&dir)).frames_only(true))
            .await
            .unwrap();
        assert_eq!(audio.calls.load(Ordering::SeqCst), 0);
        assert_eq!(report.final_verdict, FinalVerdict::No);
        assert_eq!(report.frames.tally.total(), 4);
    }

    #[tokio::test]
    async fn test_error_replies_never_flag() {
        let dir = TempDir::new().unwrap();
        let (interactor, _) = Setup {
            frame_reply: "unclear",
            text_reply: "cannot tell",
            transcript: "something",
            audio_fails: false,
        }
        .build();

        let report = interactor
            .check_video(VideoRequest::new(video_file(&dir)))
            .await
            .unwrap();
        assert_eq!(report.text.verdict, Verdict::Error);
        assert_eq!(report.frames.verdict, Verdict::No);
        assert_eq!(report.final_verdict, FinalVerdict::No);
    }

    #[tokio::test]
    async fn test_kept_audio_survives() {
        let dir = TempDir::new().unwrap();
        let (interactor, _) = Setup {
            frame_reply: "No",
            text_reply: "No",
            transcript: "",
            audio_fails: false,
        }
        .build();
        let interactor = interactor.with_keep_audio(true);

        let report = interactor
            .check_video(VideoRequest::new(video_file(&dir)))
            .await
            .unwrap();
        let kept = report.kept_audio.expect("audio path");
        assert!(kept.exists());
        std::fs::remove_dir_all(kept.parent().unwrap()).unwrap();
    }

    #[tokio::test]
    async fn test_missing_video() {
        let (interactor, _) = Setup {
            frame_reply: "No",
            text_reply: "No",
            transcript: "",
            audio_fails: false,
        }
        .build();

        let err = interactor
            .check_video(VideoRequest::new("/no/such/video.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, ScreenError::InputNotFound { .. }));
    }
}
