// Adapters - External system implementations

pub mod audio_ffmpeg;
pub mod sampler_libav;
pub mod toml_config;
pub mod transcribe_http;
pub mod vlm_http;

// Re-export adapters
pub use audio_ffmpeg::AudioFfmpegAdapter;
pub use sampler_libav::SamplerLibavAdapter;
pub use toml_config::TomlConfigAdapter;
pub use transcribe_http::TranscribeHttpAdapter;
pub use vlm_http::VlmHttpAdapter;
