//! VLM scoring adapter
//!
//! Talks to an OpenAI-compatible `chat/completions` endpoint. This is the
//! only place where free-text replies are turned into [`Verdict`]s.

use std::io::Cursor;

use async_trait::async_trait;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::prompts::render_text_prompt;
use crate::config::{PromptConfig, VlmConfig};
use crate::domain::model::*;
use crate::error::{ScreenError, ScreenResult};
use crate::ports::{FrameScorer, TextScorer};

/// Chat completion request body
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: MessageContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// HTTP client for the VLM scoring backend
pub struct VlmHttpAdapter {
    config: VlmConfig,
    prompts: PromptConfig,
    http_client: reqwest::Client,
}

impl VlmHttpAdapter {
    /// Create a new client; the request timeout comes from the config
    pub fn new(config: VlmConfig, prompts: PromptConfig) -> ScreenResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("adscreen/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .build()
            .map_err(|e| ScreenError::configuration(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            prompts,
            http_client,
        })
    }

    /// Encode a frame as a base64 JPEG data URI
    pub fn frame_data_uri(frame: &Frame, quality: u8) -> ScreenResult<String> {
        let mut buffer = Cursor::new(Vec::new());
        let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
        frame.image.write_with_encoder(encoder)?;

        let encoded = base64::engine::general_purpose::STANDARD.encode(buffer.into_inner());
        Ok(format!("data:image/jpeg;base64,{}", encoded))
    }

    /// Pull `choices[0].message.content` out of a response body
    pub fn extract_reply(body: &str) -> ScreenResult<String> {
        let response: ChatResponse = serde_json::from_str(body)
            .map_err(|e| ScreenError::decode(format!("invalid chat response: {}", e)))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| ScreenError::decode("chat response has no message content"))
    }

    async fn complete(&self, content: MessageContent) -> ScreenResult<String> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content,
            }],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let mut builder = self.http_client.post(&self.config.url).json(&request);
        if let Some(api_key) = &self.config.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            return Err(ScreenError::transport(format!(
                "VLM returned status {}: {}",
                status,
                truncate(&body, 200)
            )));
        }

        Self::extract_reply(&body)
    }

    async fn score_frame_inner(&self, frame: Frame) -> ScreenResult<String> {
        let quality = self.config.jpeg_quality;
        let data_uri = tokio::task::spawn_blocking(move || Self::frame_data_uri(&frame, quality))
            .await
            .map_err(|e| ScreenError::decode(format!("frame encoding task failed: {}", e)))??;

        let content = MessageContent::Parts(vec![
            ContentPart::Text {
                text: self.prompts.image.clone(),
            },
            ContentPart::ImageUrl {
                image_url: ImageUrl { url: data_uri },
            },
        ]);
        self.complete(content).await
    }
}

#[async_trait]
impl FrameScorer for VlmHttpAdapter {
    async fn score_frame(&self, frame: Frame) -> Assessment {
        let index = frame.index;
        match self.score_frame_inner(frame).await {
            Ok(reply) => {
                debug!(frame = index, reply = %reply, "VLM reply");
                Assessment::from_reply(reply)
            }
            Err(e) => {
                warn!(frame = index, error = %e, "Frame scoring failed");
                Assessment::from(e)
            }
        }
    }
}

#[async_trait]
impl TextScorer for VlmHttpAdapter {
    async fn score_text(&self, text: &str) -> Assessment {
        let prompt = render_text_prompt(&self.prompts.text, text);
        match self.complete(MessageContent::Text(prompt)).await {
            Ok(reply) => {
                debug!(reply = %reply, "VLM text reply");
                Assessment::from_reply(reply)
            }
            Err(e) => {
                warn!(error = %e, "Text scoring failed");
                Assessment::from(e)
            }
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}
