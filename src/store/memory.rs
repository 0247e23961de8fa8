//! In-process JSON store with slot-keyed reducer composition.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use serde_json::{Map, Value};

use parking_lot::Mutex;

use crate::subscription::{ListenerSet, Subscription};

use super::{json_kind, router_slot_reducer, RouterAction, StateStore, StoreError, StoreListener};

/// Reducer for one top-level key: `(current slot, action) -> new slot`.
/// Returning `None` removes the key.
pub type SlotReducer = Box<dyn Fn(Option<&Value>, &Value) -> Option<Value> + Send + Sync>;

/// Store over a JSON object.
///
/// Dispatch is synchronous: the action is reduced under the lock, the lock
/// is released, and each listener is then called with the new state.
/// Listeners may dispatch again. The nested dispatch notifies every listener
/// of its newer state and the outer pass stops, so each listener sees every
/// state at most once and never an older state after a newer one.
pub struct MemoryStore {
    state: Mutex<Value>,
    /// Bumped on every state change.
    revision: AtomicU64,
    reducers: Vec<(String, SlotReducer)>,
    listeners: ListenerSet<StoreListener>,
    log: Mutex<Vec<Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(Value::Object(Map::new())),
            revision: AtomicU64::new(0),
            reducers: Vec::new(),
            listeners: ListenerSet::new(),
            log: Mutex::new(Vec::new()),
        }
    }

    /// Start from `initial` instead of an empty object. Non-object values are
    /// ignored.
    pub fn with_state(self, initial: Value) -> Self {
        if initial.is_object() {
            *self.state.lock() = initial;
        } else {
            tracing::warn!(found = json_kind(&initial), "Initial store state must be an object, ignoring");
        }
        self
    }

    /// Register a reducer for `key`. Reducers run in registration order.
    pub fn with_reducer<F>(mut self, key: impl Into<String>, reducer: F) -> Self
    where
        F: Fn(Option<&Value>, &Value) -> Option<Value> + Send + Sync + 'static,
    {
        self.reducers.push((key.into(), Box::new(reducer)));
        self
    }

    /// Register [`router_slot_reducer`] under `key`.
    pub fn with_router_slot(self, key: impl Into<String>) -> Self {
        self.with_reducer(key, router_slot_reducer)
    }

    pub fn state(&self) -> Value {
        self.state.lock().clone()
    }

    /// Every action dispatched so far, in order.
    pub fn action_log(&self) -> Vec<Value> {
        self.log.lock().clone()
    }

    /// Dispatch a JSON action. It must be an object with a string `type`.
    pub fn dispatch_json(&self, action: Value) -> Result<(), StoreError> {
        let Some(action_type) = action.get("type").and_then(Value::as_str) else {
            return Err(StoreError::InvalidAction {
                reason: format!("expected an object with a string 'type', got {}", json_kind(&action)),
            });
        };
        tracing::trace!(action = %action_type, "Reducing action");

        {
            let mut state = self.state.lock();
            self.revision.fetch_add(1, Ordering::SeqCst);
            if let Value::Object(slots) = &mut *state {
                for (key, reducer) in &self.reducers {
                    match reducer(slots.get(key), &action) {
                        Some(next) => {
                            slots.insert(key.clone(), next);
                        }
                        None => {
                            slots.remove(key);
                        }
                    }
                }
            }
        }
        self.log.lock().push(action);

        self.notify();
        Ok(())
    }

    /// Replace the whole state tree (devtools time travel, undo, restore)
    /// and notify subscribers.
    pub fn replace_state(&self, state: Value) -> Result<(), StoreError> {
        if !state.is_object() {
            return Err(StoreError::NotAnObject {
                found: json_kind(&state),
            });
        }
        {
            let mut current = self.state.lock();
            *current = state;
            self.revision.fetch_add(1, Ordering::SeqCst);
        }
        self.notify();
        Ok(())
    }

    pub fn subscribe(&self, listener: StoreListener) -> Subscription {
        let subscription = self.listeners.add(listener.clone());
        listener(&self.state());
        subscription
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    fn notify(&self) {
        let (state, revision) = {
            let state = self.state.lock();
            (state.clone(), self.revision.load(Ordering::SeqCst))
        };
        for listener in self.listeners.snapshot() {
            if self.revision.load(Ordering::SeqCst) != revision {
                tracing::trace!(revision, "State changed during notification, newer pass took over");
                break;
            }
            listener(&state);
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Serialize> StateStore<T> for MemoryStore {
    fn dispatch(&self, action: RouterAction<T>) -> Result<(), StoreError> {
        let action_type = action.action_type();
        let encoded = serde_json::to_value(&action).map_err(|source| StoreError::Encode {
            action: action_type,
            source,
        })?;
        self.dispatch_json(encoded)
    }

    fn subscribe(&self, listener: StoreListener) -> Subscription {
        MemoryStore::subscribe(self, listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn counter_store() -> MemoryStore {
        MemoryStore::new().with_reducer("count", |slot, action| {
            let current = slot.and_then(Value::as_i64).unwrap_or(0);
            match action["type"].as_str() {
                Some("INCREMENT") => Some(json!(current + 1)),
                Some("RESET") => None,
                _ => slot.cloned(),
            }
        })
    }

    #[test]
    fn dispatch_reduces_slot() {
        let store = counter_store();
        store.dispatch_json(json!({"type": "INCREMENT"})).unwrap();
        store.dispatch_json(json!({"type": "INCREMENT"})).unwrap();
        assert_eq!(store.state(), json!({"count": 2}));

        store.dispatch_json(json!({"type": "RESET"})).unwrap();
        assert_eq!(store.state(), json!({}));
        assert_eq!(store.action_log().len(), 3);
    }

    #[test]
    fn action_without_type_is_rejected() {
        let store = counter_store();
        let err = store.dispatch_json(json!(["INCREMENT"])).unwrap_err();
        assert!(matches!(err, StoreError::InvalidAction { .. }));
        assert!(store.action_log().is_empty());
    }

    #[test]
    fn subscribe_emits_current_state_then_changes() {
        let store = counter_store();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let _sub = store.subscribe(Arc::new(move |state: &Value| {
            seen_clone.lock().push(state.clone());
        }));

        store.dispatch_json(json!({"type": "INCREMENT"})).unwrap();
        assert_eq!(*seen.lock(), vec![json!({}), json!({"count": 1})]);
    }

    #[test]
    fn redispatching_listener_does_not_duplicate_states() {
        let store = Arc::new(counter_store());

        let redispatch = Arc::downgrade(&store);
        let _first = store.subscribe(Arc::new(move |state: &Value| {
            if state["count"] == 1 {
                if let Some(store) = redispatch.upgrade() {
                    store.dispatch_json(json!({"type": "INCREMENT"})).unwrap();
                }
            }
        }));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let _second = store.subscribe(Arc::new(move |state: &Value| {
            seen_clone.lock().push(state["count"].clone());
        }));

        store.dispatch_json(json!({"type": "INCREMENT"})).unwrap();

        // The count of 1 was superseded before the second listener ran.
        assert_eq!(*seen.lock(), vec![Value::Null, json!(2)]);
        assert_eq!(store.state(), json!({"count": 2}));
    }

    #[test]
    fn dropped_subscription_stops_notifications() {
        let store = counter_store();
        let sub = store.subscribe(Arc::new(|_: &Value| {}));
        assert_eq!(store.subscriber_count(), 1);
        drop(sub);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn replace_state_requires_object() {
        let store = counter_store();
        let err = store.replace_state(json!(3)).unwrap_err();
        assert!(matches!(err, StoreError::NotAnObject { found: "number" }));

        store.replace_state(json!({"count": 10})).unwrap();
        store.dispatch_json(json!({"type": "INCREMENT"})).unwrap();
        assert_eq!(store.state(), json!({"count": 11}));
    }

    #[test]
    fn typed_router_action_is_encoded_on_dispatch() {
        let store = MemoryStore::new().with_router_slot("router");
        let action: RouterAction<Value> = serde_json::from_value(json!({
            "type": "ROUTER_CANCEL",
            "payload": {
                "routerState": {"url": "/c"},
                "storeState": {},
                "event": {"id": 2, "url": "/c", "reason": "guard"}
            }
        }))
        .unwrap();

        StateStore::dispatch(&store, action).unwrap();
        assert_eq!(
            store.state(),
            json!({"router": {"state": {"url": "/c"}, "navigationId": 2}})
        );
    }
}
