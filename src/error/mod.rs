//! Error handling module for AdScreen

use thiserror::Error;

/// Main error type for AdScreen operations
#[derive(Error, Debug)]
pub enum ScreenError {
    /// Input path not found or inaccessible
    #[error("Input path not found: {path}")]
    InputNotFound { path: String },

    /// Network or HTTP failure while talking to a scoring backend
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// Media or response payload could not be decoded
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// File is neither a supported image nor a supported video
    #[error("Unsupported media: {path}")]
    UnsupportedMedia { path: String },

    /// External transcoding tool is missing
    #[error("Tool not available: {tool}")]
    ToolUnavailable { tool: String },

    /// External transcoding tool ran but failed
    #[error("Transcoding failed: {message}")]
    Transcode { message: String },

    /// Invalid configuration value
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// FFmpeg error
    #[error("FFmpeg error: {0}")]
    FFmpeg(#[from] ffmpeg_next::Error),
}

impl ScreenError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for ScreenError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ScreenError::decode(err.to_string())
        } else {
            ScreenError::transport(err.to_string())
        }
    }
}

impl From<image::ImageError> for ScreenError {
    fn from(err: image::ImageError) -> Self {
        ScreenError::decode(err.to_string())
    }
}

/// Result type alias for AdScreen operations
pub type ScreenResult<T> = std::result::Result<T, ScreenError>;
