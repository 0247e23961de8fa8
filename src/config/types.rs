use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub router_store: RouterStoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings handed to the bridge at connect time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterStoreConfig {
    /// Top-level store key holding the router slot (default: "router").
    #[serde(default = "default_state_key")]
    pub state_key: String,
    /// Which router state serializer to use.
    #[serde(default)]
    pub serializer: SerializerKind,
}

/// Built-in serializer choice.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SerializerKind {
    /// Full route tree, including route data.
    #[default]
    Default,
    /// Route tree without route data.
    Minimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset (default: "info").
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log file. `NAVSYNC_LOG` takes precedence; stderr when neither is set.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_state_key() -> String {
    "router".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for RouterStoreConfig {
    fn default() -> Self {
        Self {
            state_key: default_state_key(),
            serializer: SerializerKind::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}
