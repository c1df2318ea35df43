//! Resolved configuration types shared across crates.
//!
//! Raw TOML deserialization structs (with `Option` fields) stay private in
//! the binary's config loader. The loader resolves them into these types at
//! the parse boundary, so existence of a value is the proof of its validity.

use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// What to do when the calculation endpoint fails.
///
/// Source revisions disagreed: one silently fabricated a local result on
/// transport failure, another showed the error. The behavior is explicit
/// configuration here rather than a silent pick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Return the failure to the caller; nothing is fabricated.
    #[default]
    Surface,
    /// Degrade to the local waste approximation, tagged as such.
    Approximate,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown fallback policy {0:?}, expected \"surface\" or \"approximate\"")]
pub struct PolicyParseError(String);

impl FromStr for FallbackPolicy {
    type Err = PolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "surface" => Ok(FallbackPolicy::Surface),
            "approximate" => Ok(FallbackPolicy::Approximate),
            other => Err(PolicyParseError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServerSettingsError {
    #[error("server base_url must not be empty")]
    EmptyBaseUrl,
    #[error("request timeout must be positive")]
    ZeroTimeout,
}

#[derive(Deserialize)]
struct RawServerSettings {
    base_url: String,
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    ServerSettings::DEFAULT_TIMEOUT_SECS
}

/// Validated server endpoint configuration.
///
/// Invariant: `base_url` is non-empty and `timeout_secs` is positive
/// (enforced via `#[serde(try_from)]` at the deserialization boundary).
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawServerSettings")]
pub struct ServerSettings {
    base_url: String,
    timeout_secs: u64,
}

impl TryFrom<RawServerSettings> for ServerSettings {
    type Error = ServerSettingsError;

    fn try_from(raw: RawServerSettings) -> Result<Self, Self::Error> {
        if raw.base_url.trim().is_empty() {
            return Err(ServerSettingsError::EmptyBaseUrl);
        }
        if raw.timeout_secs == 0 {
            return Err(ServerSettingsError::ZeroTimeout);
        }
        Ok(Self {
            base_url: raw.base_url,
            timeout_secs: raw.timeout_secs,
        })
    }
}

impl ServerSettings {
    /// Default request timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

    /// Build settings programmatically (tests, defaults).
    ///
    /// # Errors
    ///
    /// Same validation as the deserialization boundary.
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self, ServerSettingsError> {
        Self::try_from(RawServerSettings {
            base_url: base_url.into(),
            timeout_secs,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }
}

/// History cache configuration.
#[derive(Debug, Clone)]
pub struct HistorySettings {
    /// Bound on retained entries, always positive.
    pub capacity: usize,

    /// Override for the persistent slot path. `None` means the platform
    /// data directory.
    pub slot_path: Option<PathBuf>,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            capacity: Self::DEFAULT_CAPACITY,
            slot_path: None,
        }
    }
}

impl HistorySettings {
    /// Default bound on retained entries.
    pub const DEFAULT_CAPACITY: usize = 5;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_parses_known_names() {
        assert_eq!("surface".parse(), Ok(FallbackPolicy::Surface));
        assert_eq!("approximate".parse(), Ok(FallbackPolicy::Approximate));
        assert!("mock".parse::<FallbackPolicy>().is_err());
    }

    #[test]
    fn policy_defaults_to_surface() {
        assert_eq!(FallbackPolicy::default(), FallbackPolicy::Surface);
    }

    #[test]
    fn server_settings_reject_empty_base_url() {
        assert_eq!(
            ServerSettings::new("   ", 20).unwrap_err(),
            ServerSettingsError::EmptyBaseUrl
        );
    }

    #[test]
    fn server_settings_reject_zero_timeout() {
        assert_eq!(
            ServerSettings::new("http://localhost:8000", 0).unwrap_err(),
            ServerSettingsError::ZeroTimeout
        );
    }
}
