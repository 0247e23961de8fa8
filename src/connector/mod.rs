//! The Navigation-Store Bridge.
//!
//! Keeps the reserved store slot's URL and the router's URL in agreement in
//! both directions:
//!
//! ```text
//! router events ──→ connector ──→ RouterAction ──→ store
//!       ↑                                            │
//!       └──── navigate_by_url ←── connector ←── state change
//! ```
//!
//! Two guards stop each direction from echoing the other: while the
//! connector's own dispatch is being reduced, store notifications are
//! ignored; while a store-driven navigation is in flight, its pre-activation
//! does not dispatch a commit.
//!
//! A slot URL the bridge has already acted on is remembered together with
//! the router URL it led to. A canceled or failed attempt, or a store-driven
//! navigation that redirected, is not started again until the slot changes.
//!
//! Both collaborators must deliver callbacks one at a time on a single
//! logical execution context. No lock is held across a call into either
//! collaborator.

mod guards;
mod phase;

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use scopeguard::defer;
use serde_json::Value;

use crate::config::RouterStoreConfig;
use crate::mvi::Reducer;
use crate::router::{NavigationEngine, PreactivationSignal, RouterEvent, RouterStateSnapshot};
use crate::serializer::RouterStateSerializer;
use crate::store::{
    RouterAction, RouterCancelPayload, RouterErrorPayload, RouterNavigationPayload, StateStore,
};
use crate::subscription::Subscription;

pub use guards::{GuardSnapshot, PendingNavigation, SettledNavigation, SyncGuards};
pub use phase::{NavigationPhase, PhaseAction, PhaseReducer};

struct SyncState<T> {
    phase: NavigationPhase<T>,
    /// Last serialized snapshot, from recognition or pre-activation.
    router_state: Option<T>,
    /// Last store state seen by the store listener.
    store_state: Value,
    guards: SyncGuards,
}

impl<T: Clone + PartialEq + Send + 'static> SyncState<T> {
    fn apply(&mut self, action: PhaseAction<T>) {
        let phase = std::mem::take(&mut self.phase);
        self.phase = PhaseReducer::<T>::reduce(phase, &action);
    }

    /// Router state and store state to report with a cancel or error. An
    /// attempt that was recognized reports the store as it was at
    /// recognition.
    fn rollback_payload(&self) -> (Option<T>, Value) {
        match &self.phase {
            NavigationPhase::AwaitingCommit {
                router_state,
                store_state,
                ..
            } => (Some(router_state.clone()), store_state.clone()),
            _ => (self.router_state.clone(), self.store_state.clone()),
        }
    }
}

struct ConnectorInner<S: RouterStateSerializer> {
    engine: Arc<dyn NavigationEngine>,
    store: Arc<dyn StateStore<S::Output>>,
    serializer: S,
    state_key: String,
    sync: Mutex<SyncState<S::Output>>,
}

impl<S: RouterStateSerializer> ConnectorInner<S> {
    /// Router → store, pre-commit.
    fn before_preactivation(&self, snapshot: &RouterStateSnapshot) -> PreactivationSignal {
        let router_state = self.serializer.serialize(snapshot);

        let action = {
            let mut sync = self.sync.lock();
            sync.router_state = Some(router_state.clone());

            let Some(recognized) = sync.phase.recognized().cloned() else {
                tracing::warn!(url = %snapshot.url, "Pre-activation without a recognized navigation, not dispatching");
                return PreactivationSignal::Proceed;
            };
            sync.apply(PhaseAction::Committed);

            let slot_present = slot(&sync.store_state, &self.state_key).is_some();
            let own_request = sync.guards.take_pending_for(&recognized.url);
            if let (true, Some(request)) = (slot_present, own_request) {
                sync.guards.settle(&request.url, &recognized.url_after_redirects);
                tracing::debug!(
                    navigation_id = %recognized.id,
                    url = %request.url,
                    token = request.token,
                    "Navigation was requested by the store, not dispatching"
                );
                return PreactivationSignal::Proceed;
            }
            sync.guards.clear_settled();

            RouterAction::Navigation(RouterNavigationPayload {
                event: recognized.with_state(router_state.clone()),
                router_state,
            })
        };

        self.dispatch_router_action(action);
        PreactivationSignal::Proceed
    }

    /// Store → router.
    fn on_store_state(&self, state: &Value) {
        let (target, settled_router_url) = {
            let mut sync = self.sync.lock();
            sync.store_state = state.clone();

            let Some(url) = slot_url(state, &self.state_key) else {
                return;
            };
            if sync.guards.is_dispatching() {
                return;
            }
            if sync.guards.pending().is_some_and(|pending| pending.url == url) {
                return;
            }
            let settled = sync.guards.settled_router_url(url);
            (url.to_string(), settled)
        };

        let current = self.engine.url();
        if current == target {
            return;
        }
        if settled_router_url.as_deref() == Some(current.as_str()) {
            tracing::debug!(
                url = %target,
                router_url = %current,
                "Slot URL already handled, not navigating"
            );
            return;
        }

        let request = self.sync.lock().guards.request_navigation(&target);
        tracing::debug!(
            url = %request.url,
            token = request.token,
            "Store state differs from router, navigating"
        );
        self.engine.navigate_by_url(&request.url);
    }

    fn on_router_event(&self, event: &RouterEvent) {
        let action = match event {
            RouterEvent::RoutesRecognized(recognized) => {
                let router_state = self.serializer.serialize(&recognized.state);
                let mut sync = self.sync.lock();
                sync.router_state = Some(router_state.clone());
                let store_state = sync.store_state.clone();
                sync.apply(PhaseAction::Recognized {
                    recognized: recognized.clone(),
                    router_state,
                    store_state,
                });
                return;
            }
            RouterEvent::NavigationCancel(cancel) => {
                let mut sync = self.sync.lock();
                let (router_state, store_state) = sync.rollback_payload();
                sync.apply(PhaseAction::Canceled(cancel.id));
                RouterAction::Cancel(RouterCancelPayload {
                    router_state,
                    store_state,
                    event: cancel.clone(),
                })
            }
            RouterEvent::NavigationError(error) => {
                let mut sync = self.sync.lock();
                let (router_state, store_state) = sync.rollback_payload();
                sync.apply(PhaseAction::Errored(error.id));
                RouterAction::Error(RouterErrorPayload {
                    router_state,
                    store_state,
                    event: error.clone(),
                })
            }
            RouterEvent::NavigationStart(_) | RouterEvent::NavigationEnd(_) => return,
        };

        self.dispatch_router_action(action);
        self.settle_rollback();
    }

    /// After a cancel or error the slot may name the attempted route while
    /// the router stayed put. That pairing is final until the slot changes.
    fn settle_rollback(&self) {
        let router_url = self.engine.url();
        let mut sync = self.sync.lock();
        let Some(url) = slot_url(&sync.store_state, &self.state_key).map(str::to_string) else {
            return;
        };
        sync.guards.settle(&url, &router_url);
    }

    /// Every router action goes through here so the guards are always
    /// released, including when a store subscriber panics.
    fn dispatch_router_action(&self, action: RouterAction<S::Output>) {
        let action_type = action.action_type();
        let navigation_id = action.navigation_id();

        self.sync.lock().guards.begin_dispatch();
        defer! {
            self.sync.lock().guards.end_dispatch();
        }

        tracing::debug!(action = action_type, navigation_id = %navigation_id, "Dispatching router action");
        if let Err(err) = self.store.dispatch(action) {
            tracing::error!(
                action = action_type,
                navigation_id = %navigation_id,
                error = %err,
                "Store rejected router action"
            );
        }
    }
}

fn slot<'a>(state: &'a Value, key: &str) -> Option<&'a Value> {
    state.get(key).filter(|value| !value.is_null())
}

fn slot_url<'a>(state: &'a Value, key: &str) -> Option<&'a str> {
    slot(state, key)?.get("state")?.get("url")?.as_str()
}

/// Live connection between one router and one store.
///
/// Dropping the connector removes the pre-activation hook and both
/// subscriptions.
pub struct StoreRouterConnector<S: RouterStateSerializer> {
    inner: Arc<ConnectorInner<S>>,
    subscriptions: Vec<Subscription>,
}

impl<S: RouterStateSerializer> StoreRouterConnector<S> {
    /// Install the hook and listeners.
    ///
    /// The router event listener is installed before the store listener: a
    /// store that already holds a navigation opinion triggers a navigation
    /// from inside `subscribe`, and its events must not be missed.
    pub fn connect(
        engine: Arc<dyn NavigationEngine>,
        store: Arc<dyn StateStore<S::Output>>,
        serializer: S,
        config: &RouterStoreConfig,
    ) -> Self {
        let inner = Arc::new(ConnectorInner {
            engine,
            store,
            serializer,
            state_key: config.state_key.clone(),
            sync: Mutex::new(SyncState {
                phase: NavigationPhase::Idle,
                router_state: None,
                store_state: Value::Null,
                guards: SyncGuards::default(),
            }),
        });

        let weak: Weak<ConnectorInner<S>> = Arc::downgrade(&inner);
        inner
            .engine
            .set_before_preactivation(Some(Arc::new(move |snapshot: &RouterStateSnapshot| {
                weak.upgrade().map_or(PreactivationSignal::Proceed, |inner| {
                    inner.before_preactivation(snapshot)
                })
            })));

        let weak = Arc::downgrade(&inner);
        let events = inner.engine.subscribe(Arc::new(move |event: &RouterEvent| {
            if let Some(inner) = weak.upgrade() {
                inner.on_router_event(event);
            }
        }));

        let weak = Arc::downgrade(&inner);
        let store_changes = inner.store.subscribe(Arc::new(move |state: &Value| {
            if let Some(inner) = weak.upgrade() {
                inner.on_store_state(state);
            }
        }));

        tracing::info!(state_key = %inner.state_key, "Router store connector installed");

        Self {
            inner,
            subscriptions: vec![events, store_changes],
        }
    }

    pub fn state_key(&self) -> &str {
        &self.inner.state_key
    }

    pub fn phase(&self) -> NavigationPhase<S::Output> {
        self.inner.sync.lock().phase.clone()
    }

    pub fn guards(&self) -> GuardSnapshot {
        self.inner.sync.lock().guards.snapshot()
    }

    /// Last serialized router state captured by the connector.
    pub fn router_state(&self) -> Option<S::Output> {
        self.inner.sync.lock().router_state.clone()
    }

    /// Last store state observed by the connector.
    pub fn store_state(&self) -> Value {
        self.inner.sync.lock().store_state.clone()
    }

    pub fn disconnect(self) {
        drop(self);
    }
}

impl<S: RouterStateSerializer> Drop for StoreRouterConnector<S> {
    fn drop(&mut self) {
        self.inner.engine.set_before_preactivation(None);
        self.subscriptions.clear();
        tracing::debug!(state_key = %self.inner.state_key, "Router store connector disconnected");
    }
}
