//! Configuration validation rules.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading and CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `port` is 0
    /// - `store_dir` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Invalid { field: "port".into(), reason: "must be non-zero".into() });
        }

        if self.store_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid { field: "store_dir".into(), reason: "must not be empty".into() });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_zero_port() {
        let config = AppConfig { port: 0, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "port"));
    }

    #[test]
    fn test_validate_empty_store_dir() {
        let config = AppConfig { store_dir: "".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "store_dir"));
    }
}
