//! Conversion of navigation snapshots into the store-friendly shape kept in
//! the reserved slot.
//!
//! Any serializer must keep the URL string intact and produce a value that
//! serializes to a JSON object with a `url` field: the bridge re-navigates by
//! that URL alone.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::router::{RouteSnapshot, RouterStateSnapshot};

pub trait RouterStateSerializer: Send + Sync + 'static {
    type Output: Clone + PartialEq + Serialize + Send + Sync + 'static;

    fn serialize(&self, snapshot: &RouterStateSnapshot) -> Self::Output;
}

/// Output of [`DefaultRouterStateSerializer`]: URL plus the full route tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedRouterState {
    pub url: String,
    pub root: RouteSnapshot,
}

/// Identity projection of the snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRouterStateSerializer;

impl RouterStateSerializer for DefaultRouterStateSerializer {
    type Output = SerializedRouterState;

    fn serialize(&self, snapshot: &RouterStateSnapshot) -> Self::Output {
        SerializedRouterState {
            url: snapshot.url.clone(),
            root: snapshot.root.clone(),
        }
    }
}

/// Route node without static route data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinimalRoute {
    pub path: String,
    pub url: Vec<String>,
    pub params: BTreeMap<String, String>,
    pub query_params: BTreeMap<String, String>,
    pub fragment: Option<String>,
    pub children: Vec<MinimalRoute>,
}

impl From<&RouteSnapshot> for MinimalRoute {
    fn from(route: &RouteSnapshot) -> Self {
        Self {
            path: route.path.clone(),
            url: route.url.clone(),
            params: route.params.clone(),
            query_params: route.query_params.clone(),
            fragment: route.fragment.clone(),
            children: route.children.iter().map(MinimalRoute::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinimalRouterState {
    pub url: String,
    pub root: MinimalRoute,
}

/// Keeps URL, params and tree shape; drops route `data`, which may hold
/// values that do not belong in a persisted store.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinimalRouterStateSerializer;

impl RouterStateSerializer for MinimalRouterStateSerializer {
    type Output = MinimalRouterState;

    fn serialize(&self, snapshot: &RouterStateSnapshot) -> Self::Output {
        MinimalRouterState {
            url: snapshot.url.clone(),
            root: MinimalRoute::from(&snapshot.root),
        }
    }
}
