//! Store configuration
//!
//! Configuration can be built in code or loaded from TOML:
//!
//! ```toml
//! name = "browser"
//! shutdown = "discard"
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// What happens to queued actions when a store is torn down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShutdownPolicy {
    /// Process everything queued before the shutdown request, plus the
    /// re-entrant follow-ups those actions dispatch, then stop.
    #[default]
    Drain,
    /// Finish the action currently being processed and settle everything still
    /// queued with [`StoreError::ShutDown`](crate::StoreError::ShutDown).
    Discard,
}

/// Store configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Label used in log output
    #[serde(default = "default_name")]
    pub name: String,

    /// Teardown behavior for queued actions
    #[serde(default)]
    pub shutdown: ShutdownPolicy,
}

fn default_name() -> String {
    "store".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            shutdown: ShutdownPolicy::default(),
        }
    }
}

impl StoreConfig {
    /// Default configuration with a custom log label
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_shutdown(mut self, policy: ShutdownPolicy) -> Self {
        self.shutdown = policy;
        self
    }

    /// Parse configuration from TOML; missing keys fall back to defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        log::debug!("Loaded store config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = StoreConfig::from_toml_str("").unwrap();

        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.name, "store");
        assert_eq!(config.shutdown, ShutdownPolicy::Drain);
    }

    #[test]
    fn test_parse_full_config() {
        let config = StoreConfig::from_toml_str(
            r#"
            name = "browser"
            shutdown = "discard"
            "#,
        )
        .unwrap();

        assert_eq!(
            config,
            StoreConfig::named("browser").with_shutdown(ShutdownPolicy::Discard)
        );
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let result = StoreConfig::from_toml_str(r#"shutdown = "explode""#);

        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let path = std::env::temp_dir().join("state-store-missing-config.toml");

        match StoreConfig::load(&path) {
            Err(ConfigError::Io { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
