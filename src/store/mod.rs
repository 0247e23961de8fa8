//! State Store side: the store contract, the router action wire format,
//! the reserved-slot reducer and an in-process JSON store.
//!
//! Store state is a JSON object tree. The bridge reads the reserved slot by
//! key and looks at `navigationId` and `state.url` only.

mod action;
mod memory;
mod reducer;

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::subscription::Subscription;

pub use action::{
    is_router_action, RouterAction, RouterCancelPayload, RouterErrorPayload,
    RouterNavigationPayload, ROUTER_CANCEL, ROUTER_ERROR, ROUTER_NAVIGATION,
};
pub use memory::{MemoryStore, SlotReducer};
pub use reducer::{router_slot_reducer, RouterReducer, RouterReducerState};

/// Errors surfaced by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to encode action '{action}': {source}")]
    Encode {
        action: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid action: {reason}")]
    InvalidAction { reason: String },

    #[error("Store state must be a JSON object, got {found}")]
    NotAnObject { found: &'static str },
}

pub type StoreListener = Arc<dyn Fn(&Value) + Send + Sync>;

/// A store holding one shared state tree.
///
/// `T` is the serialized router state carried by router actions.
pub trait StateStore<T>: Send + Sync {
    /// Reduce `action` and notify subscribers synchronously.
    fn dispatch(&self, action: RouterAction<T>) -> Result<(), StoreError>;

    /// Listen for state changes. The listener is called with the current
    /// state on subscribe and with the new state after every change.
    fn subscribe(&self, listener: StoreListener) -> Subscription;
}

/// Name of the JSON type, for error messages.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
