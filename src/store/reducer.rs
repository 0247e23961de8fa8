//! Reducer for the reserved router slot.

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::mvi::{Reducer, StoreState};
use crate::router::NavigationId;

use super::action::{is_router_action, RouterAction};

/// Contents of the reserved slot: `{"state": ..., "navigationId": N}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterReducerState<T> {
    #[serde(default)]
    pub state: Option<T>,
    pub navigation_id: NavigationId,
}

/// `None` is the empty slot, before any router action was reduced.
impl<T: Clone + PartialEq + Send + 'static> StoreState for Option<RouterReducerState<T>> {}

/// Maintains the reserved slot from the three router actions.
///
/// The slot takes the payload's router state and the event's navigation id.
/// A cancel or error that carries no router state (the attempt failed before
/// anything was recognized) keeps the previous router state.
pub struct RouterReducer<T>(PhantomData<fn() -> T>);

impl<T: Clone + PartialEq + Send + 'static> Reducer for RouterReducer<T> {
    type State = Option<RouterReducerState<T>>;
    type Action = RouterAction<T>;

    fn reduce(state: Self::State, action: &Self::Action) -> Self::State {
        let router_state = action
            .router_state()
            .cloned()
            .or_else(|| state.and_then(|previous| previous.state));

        Some(RouterReducerState {
            state: router_state,
            navigation_id: action.navigation_id(),
        })
    }
}

/// [`RouterReducer`] over JSON, for JSON-shaped stores.
///
/// Non-router actions return the slot unchanged. A router action that fails
/// to decode is logged and ignored.
pub fn router_slot_reducer(slot: Option<&Value>, action: &Value) -> Option<Value> {
    if !is_router_action(action) {
        return slot.cloned();
    }

    let decoded: RouterAction<Value> = match serde_json::from_value(action.clone()) {
        Ok(decoded) => decoded,
        Err(err) => {
            tracing::warn!(error = %err, "Ignoring malformed router action");
            return slot.cloned();
        }
    };

    let previous = slot
        .filter(|value| !value.is_null())
        .and_then(|value| serde_json::from_value::<RouterReducerState<Value>>(value.clone()).ok());

    let next = RouterReducer::<Value>::reduce(previous, &decoded);
    match serde_json::to_value(next) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::error!(error = %err, "Failed to encode router slot");
            slot.cloned()
        }
    }
}
