//! Application configuration with layered loading.
//!
//! Configuration is assembled from multiple sources:
//!
//! 1. Environment variables (PAGESNAP_*)
//! 2. TOML config file (if PAGESNAP_CONFIG_FILE set)
//! 3. Built-in defaults
//!
//! The server CLI may override individual fields after loading.

use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (PAGESNAP_*)
/// 2. TOML config file (if PAGESNAP_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// TCP port the HTTP listener binds.
    ///
    /// Set via PAGESNAP_PORT environment variable.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path to the browser executable.
    ///
    /// Set via PAGESNAP_BROWSER_PATH environment variable. When unset the
    /// browser is auto-detected from well-known install locations.
    #[serde(default)]
    pub browser_path: Option<PathBuf>,

    /// Directory screenshot artifacts are stored in.
    ///
    /// Set via PAGESNAP_STORE_DIR environment variable.
    #[serde(default = "default_store_dir")]
    pub store_dir: PathBuf,

    /// Fold the scroll flag into cache keys.
    ///
    /// Off by default: a scroll=true request may then be served an artifact
    /// that was captured without scrolling, matching the historical cache
    /// layout. Set via PAGESNAP_VARY_ON_SCROLL environment variable.
    #[serde(default)]
    pub vary_on_scroll: bool,
}

fn default_port() -> u16 {
    8616
}

fn default_store_dir() -> PathBuf {
    PathBuf::from("./pngs")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            browser_path: None,
            store_dir: default_store_dir(),
            vary_on_scroll: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("PAGESNAP_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("PAGESNAP_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
