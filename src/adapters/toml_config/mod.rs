// TOML config adapter - Configuration files using TOML

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::ScreenConfig;
use crate::error::{ScreenError, ScreenResult};

/// Locations searched when no config file is given explicitly
pub const DEFAULT_CONFIG_PATHS: &[&str] = &["adscreen.toml", "config/adscreen.toml"];

/// TOML configuration adapter
pub struct TomlConfigAdapter {
    search_paths: Vec<PathBuf>,
}

impl TomlConfigAdapter {
    /// Create adapter with the default search paths
    pub fn new() -> Self {
        Self {
            search_paths: DEFAULT_CONFIG_PATHS.iter().map(PathBuf::from).collect(),
        }
    }

    /// Create adapter with custom search paths
    pub fn with_search_paths(search_paths: Vec<PathBuf>) -> Self {
        Self { search_paths }
    }

    /// Load an explicit config file. A missing file is an error.
    pub fn load_file(&self, path: &Path) -> ScreenResult<ScreenConfig> {
        if !path.exists() {
            return Err(ScreenError::configuration(format!(
                "config file does not exist: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            ScreenError::configuration(format!("failed to read {}: {}", path.display(), e))
        })?;

        let config = Self::parse(&content)?;
        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Load the first config file found on the search paths, or defaults
    pub fn load_default(&self) -> ScreenResult<ScreenConfig> {
        for path in &self.search_paths {
            if path.exists() {
                return self.load_file(path);
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(ScreenConfig::default())
    }

    /// Parse TOML text; omitted keys keep their defaults
    pub fn parse(toml_content: &str) -> ScreenResult<ScreenConfig> {
        toml::from_str(toml_content)
            .map_err(|e| ScreenError::configuration(format!("failed to parse TOML config: {}", e)))
    }

    /// Serialize a config to TOML with the API key redacted
    pub fn render_redacted(config: &ScreenConfig) -> ScreenResult<String> {
        let mut redacted = config.clone();
        if redacted.vlm.api_key.is_some() {
            redacted.vlm.api_key = Some("********".to_string());
        }
        toml::to_string_pretty(&redacted)
            .map_err(|e| ScreenError::configuration(format!("failed to serialize config: {}", e)))
    }
}

impl Default for TomlConfigAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_partial_config_keeps_defaults() {
        let config = TomlConfigAdapter::parse(
            r#"
            [vlm]
            model = "qwen-vl"

            [sampling]
            workers = 12
            mode = "first-hit"
            "#,
        )
        .unwrap();

        assert_eq!(config.vlm.model, "qwen-vl");
        assert_eq!(config.vlm.max_tokens, 1500);
        assert_eq!(config.sampling.workers, 12);
        assert_eq!(config.sampling.mode, "first-hit");
        assert_eq!(config.sampling.threshold_percent, 25.0);
    }

    #[test]
    fn test_parse_invalid_toml() {
        assert!(TomlConfigAdapter::parse("[vlm\nurl = ").is_err());
    }

    #[test]
    fn test_load_file_missing() {
        let adapter = TomlConfigAdapter::new();
        assert!(adapter.load_file(Path::new("/definitely/not/here.toml")).is_err());
    }

    #[test]
    fn test_load_default_uses_first_existing_path() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.toml");
        let present = dir.path().join("adscreen.toml");
        std::fs::write(&present, "[transcribe]\ntimeout_secs = 90\n").unwrap();

        let adapter = TomlConfigAdapter::with_search_paths(vec![missing, present]);
        let config = adapter.load_default().unwrap();
        assert_eq!(config.transcribe.timeout_secs, 90);
    }

    #[test]
    fn test_load_default_without_files() {
        let dir = TempDir::new().unwrap();
        let adapter = TomlConfigAdapter::with_search_paths(vec![dir.path().join("none.toml")]);
        assert_eq!(adapter.load_default().unwrap(), ScreenConfig::default());
    }

    #[test]
    fn test_render_redacted_hides_api_key() {
        let mut config = ScreenConfig::default();
        config.vlm.api_key = Some("super-secret".to_string());
        let rendered = TomlConfigAdapter::render_redacted(&config).unwrap();
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("********"));
    }
}
