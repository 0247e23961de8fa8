//! Actions the bridge dispatches into the store.
//!
//! Wire shape: `{"type": <discriminant>, "payload": {...}}` with camelCase
//! payload keys. Host reducers compose on this format, so it is stable.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::mvi::Action;
use crate::router::{NavigationCancel, NavigationError, NavigationId, RoutesRecognized};

pub const ROUTER_NAVIGATION: &str = "ROUTER_NAVIGATION";
pub const ROUTER_CANCEL: &str = "ROUTER_CANCEL";
pub const ROUTER_ERROR: &str = "ROUTE_ERROR";

/// Payload of `ROUTER_NAVIGATION`: the navigation is about to commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterNavigationPayload<T> {
    pub router_state: T,
    pub event: RoutesRecognized<T>,
}

/// Payload of `ROUTER_CANCEL`.
///
/// `store_state` is the full store state observed before the attempt, so
/// host reducers can roll back optimistic updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterCancelPayload<T> {
    pub router_state: Option<T>,
    pub store_state: Value,
    pub event: NavigationCancel,
}

/// Payload of `ROUTE_ERROR`. Same shape as cancellation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterErrorPayload<T> {
    pub router_state: Option<T>,
    pub store_state: Value,
    pub event: NavigationError,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum RouterAction<T> {
    #[serde(rename = "ROUTER_NAVIGATION")]
    Navigation(RouterNavigationPayload<T>),
    #[serde(rename = "ROUTER_CANCEL")]
    Cancel(RouterCancelPayload<T>),
    #[serde(rename = "ROUTE_ERROR", alias = "ROUTER_ERROR")]
    Error(RouterErrorPayload<T>),
}

impl<T> RouterAction<T> {
    pub fn action_type(&self) -> &'static str {
        match self {
            RouterAction::Navigation(_) => ROUTER_NAVIGATION,
            RouterAction::Cancel(_) => ROUTER_CANCEL,
            RouterAction::Error(_) => ROUTER_ERROR,
        }
    }

    pub fn navigation_id(&self) -> NavigationId {
        match self {
            RouterAction::Navigation(payload) => payload.event.id,
            RouterAction::Cancel(payload) => payload.event.id,
            RouterAction::Error(payload) => payload.event.id,
        }
    }

    pub fn router_state(&self) -> Option<&T> {
        match self {
            RouterAction::Navigation(payload) => Some(&payload.router_state),
            RouterAction::Cancel(payload) => payload.router_state.as_ref(),
            RouterAction::Error(payload) => payload.router_state.as_ref(),
        }
    }

    /// Store state carried for rollback (cancel and error only).
    pub fn store_state(&self) -> Option<&Value> {
        match self {
            RouterAction::Navigation(_) => None,
            RouterAction::Cancel(payload) => Some(&payload.store_state),
            RouterAction::Error(payload) => Some(&payload.store_state),
        }
    }
}

impl<T: Send + 'static> Action for RouterAction<T> {}

/// True if the JSON action's `type` is one of the router discriminants.
pub fn is_router_action(action: &Value) -> bool {
    matches!(
        action.get("type").and_then(Value::as_str),
        Some(ROUTER_NAVIGATION) | Some(ROUTER_CANCEL) | Some(ROUTER_ERROR) | Some("ROUTER_ERROR")
    )
}
