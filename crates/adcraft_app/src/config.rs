//! Optional RON configuration file. CLI flags are applied on top in `cli`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use adcraft_core::SessionConfig;
use adcraft_engine::BackendSettings;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILENAME: &str = "adcraft.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub auth_token: Option<String>,
    pub request_timeout_secs: u64,
    pub poll_interval_ms: u64,
    pub narration_interval_ms: u64,
    pub narration_steps: Vec<String>,
    pub max_consecutive_poll_failures: u32,
    pub max_poll_attempts: Option<u32>,
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let session = SessionConfig::default();
        let backend = BackendSettings::default();
        Self {
            api_base_url: backend.base_url,
            auth_token: None,
            request_timeout_secs: backend.request_timeout.as_secs(),
            poll_interval_ms: session.poll_interval.as_millis() as u64,
            narration_interval_ms: session.narration_interval.as_millis() as u64,
            narration_steps: session.narration_steps,
            max_consecutive_poll_failures: session.max_consecutive_poll_failures,
            max_poll_attempts: session.max_poll_attempts,
            log_file: None,
        }
    }
}

impl AppConfig {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            poll_interval: Duration::from_millis(self.poll_interval_ms.max(1)),
            narration_interval: Duration::from_millis(self.narration_interval_ms.max(1)),
            narration_steps: self.narration_steps.clone(),
            max_consecutive_poll_failures: self.max_consecutive_poll_failures,
            max_poll_attempts: self.max_poll_attempts,
        }
    }

    pub fn backend_settings(&self) -> BackendSettings {
        BackendSettings {
            base_url: self.api_base_url.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
            auth_token: self.auth_token.clone(),
            ..BackendSettings::default()
        }
    }
}

/// Config plus the file it came from; `source` is `None` when defaults were used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub source: Option<PathBuf>,
}

/// Loads the config file.
///
/// An explicit path must exist; without one, `./adcraft.ron` is read when
/// present and defaults are used otherwise. Runs before logging is set up,
/// so callers report `source` themselves.
pub fn load(explicit: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILENAME), false),
    };

    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {
            return Ok(LoadedConfig {
                config: AppConfig::default(),
                source: None,
            });
        }
        Err(source) => return Err(ConfigError::Read { path, source }),
    };

    let config =
        ron::from_str(&content).map_err(|source| ConfigError::Parse { path: path.clone(), source })?;
    Ok(LoadedConfig {
        config,
        source: Some(path),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.ron");
        assert!(matches!(
            load(Some(&missing)),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("adcraft.ron");
        fs::write(
            &path,
            "(api_base_url: \"https://api.example.com\", max_poll_attempts: Some(120))",
        )
        .unwrap();

        let loaded = load(Some(&path)).unwrap();
        assert_eq!(loaded.source.as_deref(), Some(path.as_path()));
        let config = loaded.config;
        assert_eq!(config.api_base_url, "https://api.example.com");
        assert_eq!(config.max_poll_attempts, Some(120));
        assert_eq!(config.poll_interval_ms, 5000);

        let session = config.session_config();
        assert_eq!(session.poll_interval, Duration::from_millis(5000));
        assert_eq!(session.narration_interval, Duration::from_millis(2500));
        assert_eq!(session.max_poll_attempts, Some(120));
        assert_eq!(config.backend_settings().base_url, "https://api.example.com");
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("adcraft.ron");
        fs::write(&path, "(api_base_url: 42").unwrap();

        assert!(matches!(load(Some(&path)), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn defaults_round_trip_through_ron() {
        let text = ron::ser::to_string_pretty(&AppConfig::default(), ron::ser::PrettyConfig::new())
            .unwrap();
        let parsed: AppConfig = ron::from_str(&text).unwrap();
        assert_eq!(parsed, AppConfig::default());
    }
}
