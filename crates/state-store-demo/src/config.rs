//! Demo configuration
//!
//! Loaded from `state-store-demo.toml` in the working directory, or the file
//! named by `STATE_STORE_DEMO_CONFIG`:
//!
//! ```toml
//! allow_close_all = true
//!
//! [store]
//! name = "browser"
//! shutdown = "drain"
//! ```

use serde::Deserialize;
use state_store::StoreConfig;
use std::env;
use std::fs;
use std::path::PathBuf;

const CONFIG_FILE: &str = "state-store-demo.toml";
const CONFIG_ENV: &str = "STATE_STORE_DEMO_CONFIG";

#[derive(Debug, Clone, Deserialize)]
pub struct DemoConfig {
    /// Settings of the browser store
    #[serde(default = "default_store")]
    pub store: StoreConfig,

    /// Let `RemoveAllTabs` through to the reducer
    #[serde(default)]
    pub allow_close_all: bool,
}

fn default_store() -> StoreConfig {
    StoreConfig::named("browser")
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            store: default_store(),
            allow_close_all: false,
        }
    }
}

fn config_path() -> PathBuf {
    env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
}

impl DemoConfig {
    /// Load the config file, or use defaults when it is missing or invalid
    pub fn load() -> Self {
        let path = config_path();
        if let Ok(content) = fs::read_to_string(&path) {
            match toml::from_str(&content) {
                Ok(config) => {
                    log::info!("Loaded demo config from {}", path.display());
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to parse {}: {}", path.display(), e);
                }
            }
        }

        log::debug!("Using default demo config");
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use state_store::ShutdownPolicy;

    #[test]
    fn test_default_config() {
        let config = DemoConfig::default();

        assert_eq!(config.store.name, "browser");
        assert_eq!(config.store.shutdown, ShutdownPolicy::Drain);
        assert!(!config.allow_close_all);
    }

    #[test]
    fn test_config_deserialize() {
        let toml = r#"
            allow_close_all = true

            [store]
            shutdown = "discard"
        "#;
        let config: DemoConfig = toml::from_str(toml).unwrap();

        assert!(config.allow_close_all);
        assert_eq!(config.store.shutdown, ShutdownPolicy::Discard);
        // Keys missing from the table fall back to the library defaults
        assert_eq!(config.store.name, "store");
    }

    #[test]
    fn test_missing_store_table_uses_demo_name() {
        let config: DemoConfig = toml::from_str("").unwrap();

        assert_eq!(config.store.name, "browser");
    }
}
