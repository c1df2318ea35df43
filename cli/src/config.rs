//! Configuration loading.
//!
//! Raw TOML structs (with `Option` fields) stay private here; resolution
//! into the shared settings types happens at the parse boundary. A missing
//! config file is not an error - every setting has a default.

use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::Deserialize;
use thiserror::Error;

use offcut_types::{FallbackPolicy, HistorySettings, ServerSettings};

/// Server used when no config file overrides it.
const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Config file location under the platform config directory.
const CONFIG_SUBPATH: &str = "offcut/config.toml";

/// Environment variable overriding the config file path.
const CONFIG_ENV_VAR: &str = "OFFCUT_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: io::Error,
    },
    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("history capacity must be positive")]
    ZeroCapacity,
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    /// `ServerSettings` validates itself at the deserialization boundary.
    server: Option<ServerSettings>,
    #[serde(default)]
    fallback: FallbackPolicy,
    history: Option<RawHistory>,
}

#[derive(Debug, Deserialize)]
struct RawHistory {
    capacity: Option<usize>,
    slot_path: Option<PathBuf>,
}

/// Fully resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub fallback: FallbackPolicy,
    pub history: HistorySettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerSettings::new(DEFAULT_BASE_URL, ServerSettings::DEFAULT_TIMEOUT_SECS)
                .expect("default server settings are valid"),
            fallback: FallbackPolicy::default(),
            history: HistorySettings::default(),
        }
    }
}

impl AppConfig {
    /// Load from `$OFFCUT_CONFIG` or the platform config directory,
    /// falling back to defaults when no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load and resolve a specific config file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: RawConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Self::resolve(raw)
    }

    fn resolve(raw: RawConfig) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let history = match raw.history {
            Some(h) => {
                let capacity = h.capacity.unwrap_or(HistorySettings::DEFAULT_CAPACITY);
                if capacity == 0 {
                    return Err(ConfigError::ZeroCapacity);
                }
                HistorySettings {
                    capacity,
                    slot_path: h.slot_path,
                }
            }
            None => defaults.history,
        };

        Ok(Self {
            server: raw.server.unwrap_or(defaults.server),
            fallback: raw.fallback,
            history,
        })
    }
}

fn config_path() -> Option<PathBuf> {
    if let Ok(path) = env::var(CONFIG_ENV_VAR) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join(CONFIG_SUBPATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(dir: &tempfile::TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        fs::write(&path, content).expect("write config");
        path
    }

    #[test]
    fn defaults_without_a_file() {
        let config = AppConfig::default();
        assert_eq!(config.server.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.fallback, FallbackPolicy::Surface);
        assert_eq!(config.history.capacity, HistorySettings::DEFAULT_CAPACITY);
        assert!(config.history.slot_path.is_none());
    }

    #[test]
    fn full_config_resolves() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_config(
            &dir,
            r#"
            fallback = "approximate"

            [server]
            base_url = "http://calc.example.test:9000"
            timeout_secs = 5

            [history]
            capacity = 10
            "#,
        );

        let config = AppConfig::load_from(&path).expect("load");
        assert_eq!(config.server.base_url(), "http://calc.example.test:9000");
        assert_eq!(config.server.timeout_secs(), 5);
        assert_eq!(config.fallback, FallbackPolicy::Approximate);
        assert_eq!(config.history.capacity, 10);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_config(
            &dir,
            r#"
            [server]
            base_url = "http://calc.example.test"
            "#,
        );

        let config = AppConfig::load_from(&path).expect("load");
        assert_eq!(config.server.timeout_secs(), ServerSettings::DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.fallback, FallbackPolicy::Surface);
        assert_eq!(config.history.capacity, HistorySettings::DEFAULT_CAPACITY);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_config(&dir, "[history]\ncapacity = 0\n");

        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::ZeroCapacity)
        ));
    }

    #[test]
    fn invalid_server_section_fails_to_parse() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_config(&dir, "[server]\nbase_url = \"  \"\n");

        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
