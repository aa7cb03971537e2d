//! Configuration initialization and hierarchy management

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::adapters::TomlConfigAdapter;
use crate::config::ScreenConfig;
use crate::error::ScreenResult;

/// Values given on the command line; `None` leaves the lower layers alone
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub interval_seconds: Option<f64>,
    pub workers: Option<usize>,
    pub threshold_percent: Option<f64>,
    pub mode: Option<String>,
    pub keep_audio: Option<bool>,
}

impl ConfigOverrides {
    /// Apply onto `config`, returning the number of values changed
    pub fn apply(&self, config: &mut ScreenConfig) -> usize {
        let mut applied = 0;

        if let Some(interval) = self.interval_seconds {
            config.sampling.interval_seconds = interval;
            applied += 1;
        }
        if let Some(workers) = self.workers {
            config.sampling.workers = workers;
            applied += 1;
        }
        if let Some(threshold) = self.threshold_percent {
            config.sampling.threshold_percent = threshold;
            applied += 1;
        }
        if let Some(mode) = &self.mode {
            config.sampling.mode = mode.clone();
            applied += 1;
        }
        if let Some(keep) = self.keep_audio {
            config.audio.keep = keep;
            applied += 1;
        }

        applied
    }
}

/// Build the configuration following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration_hierarchy(
    config_path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<ScreenConfig> {
    info!("Initializing configuration hierarchy");

    let config = resolve_configuration(
        &TomlConfigAdapter::new(),
        config_path,
        |name| std::env::var(name).ok(),
        overrides,
    )
    .context("Invalid configuration")?;

    info!(
        "Configuration ready: {} workers, {}s interval, {} mode",
        config.sampling.workers,
        config.sampling.interval_seconds,
        config.sampling.mode
    );
    Ok(config)
}

/// Layer file, environment and CLI values, then validate
pub fn resolve_configuration<F>(
    adapter: &TomlConfigAdapter,
    config_path: Option<&Path>,
    env_lookup: F,
    overrides: &ConfigOverrides,
) -> ScreenResult<ScreenConfig>
where
    F: Fn(&str) -> Option<String>,
{
    // Steps 1-2: defaults, then file
    let mut config = match config_path {
        Some(path) => adapter.load_file(path)?,
        None => adapter.load_default()?,
    };

    // Step 3: environment
    config.apply_env(env_lookup)?;

    // Step 4: CLI
    let cli_overrides = overrides.apply(&mut config);
    if cli_overrides > 0 {
        debug!("Applied {} CLI overrides", cli_overrides);
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::AggregationMode;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_cli_beats_env_beats_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("adscreen.toml");
        std::fs::write(
            &file,
            "[sampling]\nworkers = 10\nthreshold_percent = 30.0\ninterval_seconds = 2.0\n",
        )
        .unwrap();

        let env = |name: &str| match name {
            "ADSCREEN_WORKERS" => Some("20".to_string()),
            "ADSCREEN_THRESHOLD" => Some("35".to_string()),
            _ => None,
        };
        let overrides = ConfigOverrides {
            workers: Some(5),
            ..ConfigOverrides::default()
        };

        let config =
            resolve_configuration(&TomlConfigAdapter::new(), Some(file.as_path()), env, &overrides)
                .unwrap();

        assert_eq!(config.sampling.workers, 5);
        assert_eq!(config.sampling.threshold_percent, 35.0);
        assert_eq!(config.sampling.interval_seconds, 2.0);
    }

    #[test]
    fn test_defaults_without_file() {
        let dir = TempDir::new().unwrap();
        let adapter = TomlConfigAdapter::with_search_paths(vec![dir.path().join("none.toml")]);

        let config =
            resolve_configuration(&adapter, None, no_env, &ConfigOverrides::default()).unwrap();
        assert_eq!(config, ScreenConfig::default());
        assert_eq!(config.aggregation_mode().unwrap(), AggregationMode::default());
    }

    #[test]
    fn test_invalid_override_rejected() {
        let dir = TempDir::new().unwrap();
        let adapter = TomlConfigAdapter::with_search_paths(vec![dir.path().join("none.toml")]);
        let overrides = ConfigOverrides {
            threshold_percent: Some(150.0),
            ..ConfigOverrides::default()
        };

        assert!(resolve_configuration(&adapter, None, no_env, &overrides).is_err());
    }

    #[test]
    fn test_explicit_missing_file_rejected() {
        let adapter = TomlConfigAdapter::new();
        let result = resolve_configuration(
            &adapter,
            Some(Path::new("/no/such/adscreen.toml")),
            no_env,
            &ConfigOverrides::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_keep_audio_override() {
        let mut config = ScreenConfig::default();
        let overrides = ConfigOverrides {
            keep_audio: Some(true),
            mode: Some("first-hit".to_string()),
            ..ConfigOverrides::default()
        };
        assert_eq!(overrides.apply(&mut config), 2);
        assert!(config.audio.keep);
        assert_eq!(config.aggregation_mode().unwrap(), AggregationMode::FirstHit);
    }
}
