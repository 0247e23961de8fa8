use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::config::{Config, SerializerKind};
use crate::connector::StoreRouterConnector;
use crate::router::{MemoryRouter, NavigationEngine, RouteTable, RouterEvent};
use crate::serializer::{
    DefaultRouterStateSerializer, MinimalRouterStateSerializer, RouterStateSerializer,
};
use crate::store::MemoryStore;

use super::{Scenario, ScenarioError, Step};

/// Outcome of a replay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    pub scenario: String,
    /// Every action the store reduced, host actions included.
    pub actions: Vec<Value>,
    pub events: Vec<RouterEvent>,
    pub final_url: String,
    pub final_state: Value,
}

/// Replay `scenario` with a fresh router, store and bridge.
pub fn run_scenario(scenario: &Scenario, config: &Config) -> Result<ReplayReport, ScenarioError> {
    match config.router_store.serializer {
        SerializerKind::Default => replay(scenario, config, DefaultRouterStateSerializer),
        SerializerKind::Minimal => replay(scenario, config, MinimalRouterStateSerializer),
    }
}

fn replay<S>(scenario: &Scenario, config: &Config, serializer: S) -> Result<ReplayReport, ScenarioError>
where
    S: RouterStateSerializer + Clone,
{
    let state_key = config.router_store.state_key.clone();
    let routes = RouteTable::new(scenario.routes.clone())?;

    let router = Arc::new(MemoryRouter::new(routes.clone()));
    let store = Arc::new(
        MemoryStore::new()
            .with_state(scenario.initial_state.clone().unwrap_or_else(|| json!({})))
            .with_router_slot(state_key.clone()),
    );

    tracing::info!(
        scenario = %scenario.name,
        steps = scenario.steps.len(),
        state_key = %state_key,
        "Replaying scenario"
    );

    let connector = StoreRouterConnector::connect(
        router.clone(),
        store.clone(),
        serializer.clone(),
        &config.router_store,
    );

    for (index, step) in scenario.steps.iter().enumerate() {
        let span = tracing::info_span!("step", index, kind = step.kind());
        let _enter = span.enter();

        match step {
            Step::Navigate { url } => router.navigate_by_url(url),
            Step::Restore { url, navigation_id } => {
                let router_state = match routes.recognize(url) {
                    Ok(recognition) => serde_json::to_value(serializer.serialize(&recognition.snapshot))?,
                    Err(err) => {
                        tracing::warn!(url = %url, error = %err, "Restoring a URL no route matches");
                        json!({ "url": url })
                    }
                };

                let mut state = match store.state() {
                    Value::Object(slots) => slots,
                    _ => Map::new(),
                };
                state.insert(
                    state_key.clone(),
                    json!({ "state": router_state, "navigationId": navigation_id }),
                );
                store
                    .replace_state(Value::Object(state))
                    .map_err(|source| ScenarioError::Store { step: index, source })?;
            }
            Step::Dispatch { action } => store
                .dispatch_json(action.clone())
                .map_err(|source| ScenarioError::Store { step: index, source })?,
        }

        tracing::debug!(url = %router.url(), phase = connector.phase().name(), "Step done");
    }

    connector.disconnect();

    Ok(ReplayReport {
        scenario: scenario.name.clone(),
        actions: store.action_log(),
        events: router.events(),
        final_url: router.url(),
        final_state: store.state(),
    })
}
