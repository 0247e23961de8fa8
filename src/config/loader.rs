use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::Config;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/navsync/config.toml` on Unix/macOS, or the platform
    /// equivalent via `dirs::config_dir()`. Falls back to the current
    /// directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("navsync").join("config.toml")
    }

    /// Loads configuration from the default config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - If the file exists, parses it as TOML and validates.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// The state key addresses a single top-level store key, so it must be
    /// non-empty and contain no `.`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let key = &self.router_store.state_key;
        if key.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "router_store.state_key must not be empty".to_string(),
            });
        }
        if key.contains('.') {
            return Err(ConfigError::ValidationError {
                message: format!("router_store.state_key '{}' must not contain '.'", key),
            });
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "logging.level must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SerializerKind;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.router_store.state_key, "router");
        assert_eq!(config.router_store.serializer, SerializerKind::Default);
    }

    #[test]
    fn dotted_state_key_is_rejected() {
        let mut config = Config::default();
        config.router_store.state_key = "app.router".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("must not contain '.'"));
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str("[router_store]\nserializer = \"minimal\"\n").unwrap();
        assert_eq!(config.router_store.state_key, "router");
        assert_eq!(config.router_store.serializer, SerializerKind::Minimal);
        assert_eq!(config.logging.level, "info");
    }
}
