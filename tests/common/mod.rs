//! Shared test utilities: a router, a store and a connected bridge.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use navsync::config::RouterStoreConfig;
use navsync::connector::StoreRouterConnector;
use navsync::router::{MemoryRouter, Route, RouteTable};
use navsync::serializer::DefaultRouterStateSerializer;
use navsync::store::{is_router_action, router_slot_reducer, MemoryStore};
use serde_json::{json, Value};
use tempfile::TempDir;

/// Host action that rewrites the router slot's URL directly.
pub const SET_ROUTER_URL: &str = "SET_ROUTER_URL";

/// `/a`, `/b`, guarded `/c`, failing `/d`, `/old` → `/a`, `/users/:id`.
pub fn routes() -> RouteTable {
    RouteTable::new(vec![
        Route::new("/a"),
        Route::new("/b"),
        Route::new("/c").deny(),
        Route::new("/d").fail_resolve("resolver failed for /d"),
        Route::new("/old").redirect_to("/a"),
        Route::new("/users/:id").with_data("title", json!("User")),
    ])
    .expect("Failed to build route table")
}

/// Router slot reducer that also honors [`SET_ROUTER_URL`].
pub fn host_slot_reducer(slot: Option<&Value>, action: &Value) -> Option<Value> {
    if action["type"] == SET_ROUTER_URL {
        let mut next = slot.cloned().unwrap_or_else(|| json!({ "navigationId": 0 }));
        next["state"] = json!({ "url": action["url"] });
        return Some(next);
    }
    router_slot_reducer(slot, action)
}

pub struct Harness {
    pub router: Arc<MemoryRouter>,
    pub store: Arc<MemoryStore>,
    pub connector: StoreRouterConnector<DefaultRouterStateSerializer>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_initial_state(json!({}))
    }

    /// Build the store with `state` before the bridge connects.
    pub fn with_initial_state(state: Value) -> Self {
        Self::with_store(
            MemoryStore::new()
                .with_state(state)
                .with_reducer("router", host_slot_reducer),
        )
    }

    /// Connect the bridge to a caller-built store.
    pub fn with_store(store: MemoryStore) -> Self {
        let router = Arc::new(MemoryRouter::new(routes()));
        let store = Arc::new(store);
        let connector = StoreRouterConnector::connect(
            router.clone(),
            store.clone(),
            DefaultRouterStateSerializer,
            &RouterStoreConfig::default(),
        );
        Self {
            router,
            store,
            connector,
        }
    }

    /// Router actions reduced by the store, in order.
    pub fn router_actions(&self) -> Vec<Value> {
        self.store
            .action_log()
            .into_iter()
            .filter(is_router_action)
            .collect()
    }

    pub fn actions_of(&self, action_type: &str) -> Vec<Value> {
        self.router_actions()
            .into_iter()
            .filter(|action| action["type"] == action_type)
            .collect()
    }

    /// Navigation ids of the `ROUTER_NAVIGATION` actions, in order.
    pub fn committed_ids(&self) -> Vec<Value> {
        self.actions_of("ROUTER_NAVIGATION")
            .iter()
            .map(|action| action["payload"]["event"]["id"].clone())
            .collect()
    }

    pub fn slot(&self) -> Value {
        self.store.state()["router"].clone()
    }

    pub fn set_slot_url(&self, url: &str) {
        self.store
            .dispatch_json(json!({ "type": SET_ROUTER_URL, "url": url }))
            .expect("Failed to dispatch host action");
    }
}

/// Write `content` to `name` inside a fresh temp dir.
pub fn temp_file(name: &str, content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write temp file");
    (temp_dir, path)
}

/// Scenario covering a commit, a guard cancel and a resolver error.
pub const GUARDED_SCENARIO: &str = r#"
name = "guarded"

[[routes]]
path = "/a"

[[routes]]
path = "/c"
can_activate = false

[[routes]]
path = "/d"
resolve_error = "resolver failed for /d"

[[steps]]
kind = "navigate"
url = "/a"

[[steps]]
kind = "navigate"
url = "/c"

[[steps]]
kind = "navigate"
url = "/d"
"#;
