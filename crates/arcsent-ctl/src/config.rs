//! Application configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use arcsent_dashboard::DashboardConfig;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Config path used when neither `--config` nor `ARCSENT_CONFIG` is given.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Daemon API endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Daemon root URL; `/api` is appended per request.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Overall request timeout in seconds. None = transport defaults.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8788".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Persistent credential location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialConfig {
    #[serde(default = "default_credential_path")]
    pub path: PathBuf,
}

fn default_credential_path() -> PathBuf {
    PathBuf::from(".arcsent/credentials.json")
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            path: default_credential_path(),
        }
    }
}

/// Top-level `arcsent-ctl` configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub credential: CredentialConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

impl AppConfig {
    /// Load from `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &str) -> AppResult<Self> {
        if Path::new(path).exists() {
            Self::from_file(path)
        } else {
            tracing::warn!(path = %path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> AppResult<Self> {
        toml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.api.base_url, "http://127.0.0.1:8788");
        assert_eq!(config.api.timeout(), None);
        assert_eq!(
            config.credential.path,
            PathBuf::from(".arcsent/credentials.json")
        );
        assert!(config.dashboard.refresh_on_start);
        assert_eq!(config.dashboard.watch_interval_secs, 10);
    }

    #[test]
    fn test_partial_toml() {
        let config = AppConfig::from_toml(
            r#"
            [api]
            base_url = "https://arcsent.internal:9000/"
            timeout_secs = 5

            [dashboard]
            watch_interval_secs = 30
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://arcsent.internal:9000/");
        assert_eq!(config.api.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.credential, CredentialConfig::default());
        assert!(config.dashboard.refresh_on_start);
        assert_eq!(config.dashboard.watch_interval_secs, 30);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(AppConfig::from_toml("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_invalid_toml() {
        let err = AppConfig::from_toml("[api]\nbase_url = 42\n").unwrap_err();
        assert!(matches!(err, AppError::Config(msg) if msg.starts_with("Failed to parse config")));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let config = AppConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[credential]\npath = \"/var/lib/arcsent/token.json\"").unwrap();

        let config = AppConfig::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(
            config.credential.path,
            PathBuf::from("/var/lib/arcsent/token.json")
        );
    }

    #[test]
    fn test_shipped_default_config_parses() {
        let shipped = include_str!("../../../config/default.toml");
        assert_eq!(AppConfig::from_toml(shipped).unwrap(), AppConfig::default());
    }
}
