// Transcribe HTTP adapter - Speech-to-text over multipart upload

use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::TranscribeConfig;
use crate::error::{ScreenError, ScreenResult};
use crate::ports::Transcriber;

/// Response keys tried in order
const TRANSCRIPT_KEYS: &[&str] = &["text", "transcript", "result"];

/// HTTP client for the transcription service
pub struct TranscribeHttpAdapter {
    url: String,
    http_client: reqwest::Client,
}

impl TranscribeHttpAdapter {
    pub fn new(config: &TranscribeConfig) -> ScreenResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("adscreen/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .build()
            .map_err(|e| ScreenError::configuration(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            url: config.url.clone(),
            http_client,
        })
    }

    /// Pull the transcript out of a JSON response.
    ///
    /// The first of `text`, `transcript`, `result` holding a non-empty string
    /// wins. A bare JSON string is accepted as the transcript itself.
    pub fn extract_transcript(value: &Value) -> Option<String> {
        if let Value::String(text) = value {
            return Some(text.trim().to_string());
        }

        TRANSCRIPT_KEYS
            .iter()
            .find_map(|key| {
                value
                    .get(*key)
                    .and_then(Value::as_str)
                    .filter(|text| !text.is_empty())
            })
            .map(|text| text.trim().to_string())
    }

    async fn upload(&self, audio_path: &Path) -> ScreenResult<String> {
        let bytes = tokio::fs::read(audio_path).await?;
        let file_name = audio_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio.wav".to_string());

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("audio/wav")?;
        let form = Form::new().part("file", part);

        let response = self.http_client.post(&self.url).multipart(form).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(ScreenError::transport(format!(
                "transcription service returned status {}",
                status
            )));
        }

        let value: Value = response.json().await?;
        Self::extract_transcript(&value)
            .ok_or_else(|| ScreenError::decode("transcription response has no text field"))
    }
}

#[async_trait]
impl Transcriber for TranscribeHttpAdapter {
    async fn transcribe(&self, audio_path: &Path) -> String {
        match self.upload(audio_path).await {
            Ok(text) => {
                info!("Transcribed {} characters", text.chars().count());
                debug!(transcript = %text, "Transcript");
                text
            }
            Err(e) => {
                warn!("Transcription of {} failed: {}", audio_path.display(), e);
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_extract_transcript_key_order() {
        assert_eq!(
            TranscribeHttpAdapter::extract_transcript(&json!({"text": " hello "})),
            Some("hello".to_string())
        );
        assert_eq!(
            TranscribeHttpAdapter::extract_transcript(&json!({"transcript": "from transcript"})),
            Some("from transcript".to_string())
        );
        assert_eq!(
            TranscribeHttpAdapter::extract_transcript(&json!({"result": "from result"})),
            Some("from result".to_string())
        );
        assert_eq!(
            TranscribeHttpAdapter::extract_transcript(
                &json!({"result": "third", "text": "first", "transcript": "second"})
            ),
            Some("first".to_string())
        );
    }

    #[test]
    fn test_extract_transcript_skips_non_strings() {
        assert_eq!(
            TranscribeHttpAdapter::extract_transcript(&json!({"text": null, "result": "ok"})),
            Some("ok".to_string())
        );
        assert_eq!(TranscribeHttpAdapter::extract_transcript(&json!({"segments": []})), None);
        assert_eq!(
            TranscribeHttpAdapter::extract_transcript(&json!({"text": "", "transcript": "spoken"})),
            Some("spoken".to_string())
        );
        assert_eq!(TranscribeHttpAdapter::extract_transcript(&json!({"text": ""})), None);
        assert_eq!(
            TranscribeHttpAdapter::extract_transcript(&json!("plain")),
            Some("plain".to_string())
        );
    }

    #[tokio::test]
    async fn test_missing_audio_gives_empty_transcript() {
        let adapter = TranscribeHttpAdapter::new(&TranscribeConfig::default()).unwrap();
        let text = adapter.transcribe(Path::new("/no/such/audio.wav")).await;
        assert!(text.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_service_gives_empty_transcript() {
        let dir = TempDir::new().unwrap();
        let audio = dir.path().join("clip_audio.wav");
        std::fs::write(&audio, b"RIFF").unwrap();

        let adapter = TranscribeHttpAdapter::new(&TranscribeConfig {
            url: "http://127.0.0.1:9/transcribe".to_string(),
            timeout_secs: 2,
        })
        .unwrap();
        assert!(adapter.transcribe(&audio).await.is_empty());
    }
}
