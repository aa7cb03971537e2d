//! FFmpeg audio extraction adapter
//!
//! Shells out to the `ffmpeg` binary to produce the mono, 16-bit, 16 kHz PCM
//! WAV the transcription service expects.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::AudioConfig;
use crate::error::{ScreenError, ScreenResult};
use crate::ports::{AudioExtractor, ExtractedAudio};

/// FFmpeg-based audio extractor
pub struct AudioFfmpegAdapter {
    ffmpeg_path: String,
    output_dir: Option<PathBuf>,
    keep: bool,
}

impl AudioFfmpegAdapter {
    /// Create new FFmpeg audio adapter
    pub fn new(config: &AudioConfig) -> Self {
        Self {
            ffmpeg_path: config.ffmpeg_path.clone(),
            output_dir: config.output_dir.clone(),
            keep: config.keep,
        }
    }

    /// Arguments for a mono 16 kHz signed 16-bit PCM extraction
    pub fn transcode_args(video_path: &Path, output_path: &Path) -> Vec<String> {
        vec![
            "-i".to_string(),
            video_path.to_string_lossy().to_string(),
            "-vn".to_string(),
            "-acodec".to_string(),
            "pcm_s16le".to_string(),
            "-ar".to_string(),
            "16000".to_string(),
            "-ac".to_string(),
            "1".to_string(),
            "-y".to_string(),
            output_path.to_string_lossy().to_string(),
        ]
    }

    /// `<stem>_audio.wav`
    pub fn audio_file_name(video_path: &Path) -> String {
        let stem = video_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| "video".to_string());
        format!("{}_audio.wav", stem)
    }

    /// Pick the output location: a kept file in the output directory, or a
    /// file in a scratch directory removed when the audio is dropped
    fn prepare_output(&self, video_path: &Path) -> ScreenResult<ExtractedAudio> {
        let file_name = Self::audio_file_name(video_path);

        if self.keep {
            let dir = self
                .output_dir
                .clone()
                .unwrap_or_else(std::env::temp_dir);
            std::fs::create_dir_all(&dir)?;
            Ok(ExtractedAudio::persistent(dir.join(file_name)))
        } else {
            let scratch = tempfile::Builder::new().prefix("adscreen-audio-").tempdir()?;
            let path = scratch.path().join(file_name);
            Ok(ExtractedAudio::scratch(path, scratch))
        }
    }
}

#[async_trait]
impl AudioExtractor for AudioFfmpegAdapter {
    async fn extract_audio(&self, video_path: &Path) -> ScreenResult<ExtractedAudio> {
        if !video_path.exists() {
            return Err(ScreenError::InputNotFound {
                path: video_path.to_string_lossy().to_string(),
            });
        }

        let audio = self.prepare_output(video_path)?;
        let args = Self::transcode_args(video_path, audio.path());
        debug!("Running {} {:?}", self.ffmpeg_path, args);

        let output = Command::new(&self.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => ScreenError::ToolUnavailable {
                    tool: self.ffmpeg_path.clone(),
                },
                _ => ScreenError::Io(e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let tail: String = stderr
                .lines()
                .rev()
                .take(5)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect::<Vec<_>>()
                .join("\n");
            return Err(ScreenError::Transcode {
                message: format!("ffmpeg exited with {}: {}", output.status, tail),
            });
        }

        info!("Extracted audio to {}", audio.path().display());
        Ok(audio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_transcode_args_request_mono_16khz_pcm() {
        let args = AudioFfmpegAdapter::transcode_args(Path::new("in.mp4"), Path::new("out.wav"));
        let joined = args.join(" ");
        assert!(joined.contains("-acodec pcm_s16le"));
        assert!(joined.contains("-ar 16000"));
        assert!(joined.contains("-ac 1"));
        assert!(joined.contains("-vn"));
        assert_eq!(args.last().map(String::as_str), Some("out.wav"));
    }

    #[test]
    fn test_audio_file_name() {
        assert_eq!(
            AudioFfmpegAdapter::audio_file_name(Path::new("/videos/Drama (5).mp4")),
            "Drama (5)_audio.wav"
        );
    }

    #[tokio::test]
    async fn test_missing_tool_is_reported() {
        let dir = TempDir::new().unwrap();
        let video = dir.path().join("clip.mp4");
        std::fs::write(&video, b"not really a video").unwrap();

        let adapter = AudioFfmpegAdapter::new(&AudioConfig {
            ffmpeg_path: "adscreen-no-such-ffmpeg-binary".to_string(),
            output_dir: None,
            keep: false,
        });

        let err = adapter.extract_audio(&video).await.unwrap_err();
        assert!(matches!(err, ScreenError::ToolUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_missing_input_is_reported() {
        let adapter = AudioFfmpegAdapter::new(&AudioConfig::default());
        let err = adapter
            .extract_audio(Path::new("/no/such/video.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, ScreenError::InputNotFound { .. }));
    }

    #[test]
    fn test_scratch_output_is_removed_on_drop() {
        let adapter = AudioFfmpegAdapter::new(&AudioConfig::default());
        let audio = adapter.prepare_output(Path::new("clip.mp4")).unwrap();
        let dir = audio.path().parent().unwrap().to_path_buf();
        assert!(dir.exists());
        drop(audio);
        assert!(!dir.exists());
    }

    #[test]
    fn test_kept_output_goes_to_output_dir() {
        let dir = TempDir::new().unwrap();
        let adapter = AudioFfmpegAdapter::new(&AudioConfig {
            ffmpeg_path: "ffmpeg".to_string(),
            output_dir: Some(dir.path().join("audio")),
            keep: true,
        });
        let audio = adapter.prepare_output(Path::new("promo.mov")).unwrap();
        assert_eq!(audio.path(), dir.path().join("audio").join("promo_audio.wav"));
        assert!(dir.path().join("audio").is_dir());
    }
}
