//! Scripted replays of a route table and a sequence of steps against the
//! in-process router and store.
//!
//! ```toml
//! name = "guarded admin"
//!
//! [[routes]]
//! path = "/home"
//!
//! [[routes]]
//! path = "/admin"
//! can_activate = false
//!
//! [[steps]]
//! kind = "navigate"
//! url = "/home"
//!
//! [[steps]]
//! kind = "navigate"
//! url = "/admin"
//! ```

mod runner;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::router::{Route, RouteError};
use crate::store::StoreError;

pub use runner::{run_scenario, ReplayReport};

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Failed to read scenario file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse scenario file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid route table: {0}")]
    Routes(#[from] RouteError),

    #[error("Store rejected step {step}: {source}")]
    Store {
        step: usize,
        #[source]
        source: StoreError,
    },

    #[error("Failed to serialize restored router state: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A route table plus the steps to replay against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    pub routes: Vec<Route>,
    /// Store state before the bridge connects. Must be a table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_state: Option<Value>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
    /// User navigation through the router.
    Navigate { url: String },
    /// Overwrite the router slot directly, as devtools time travel would.
    Restore { url: String, navigation_id: u64 },
    /// Host action dispatched to the store as-is.
    Dispatch { action: Value },
}

impl Step {
    pub fn kind(&self) -> &'static str {
        match self {
            Step::Navigate { .. } => "navigate",
            Step::Restore { .. } => "restore",
            Step::Dispatch { .. } => "dispatch",
        }
    }
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let content = fs::read_to_string(path).map_err(|e| ScenarioError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::from_toml_str(&content).map_err(|e| ScenarioError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
