//! Immutable projection of where navigation currently is.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One node of the activated route tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSnapshot {
    /// Route config path pattern that produced this node (e.g. `users/:id`).
    pub path: String,
    /// URL segments consumed by this node.
    pub url: Vec<String>,
    /// Values bound to `:param` segments.
    pub params: BTreeMap<String, String>,
    pub query_params: BTreeMap<String, String>,
    pub fragment: Option<String>,
    /// Static data attached to the route definition.
    pub data: BTreeMap<String, Value>,
    pub children: Vec<RouteSnapshot>,
}

impl RouteSnapshot {
    pub fn first_child(&self) -> Option<&RouteSnapshot> {
        self.children.first()
    }

    /// Follow first children down to the deepest activated node.
    pub fn leaf(&self) -> &RouteSnapshot {
        let mut node = self;
        while let Some(child) = node.first_child() {
            node = child;
        }
        node
    }
}

/// Snapshot handed to the pre-activation hook and carried on `RoutesRecognized`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterStateSnapshot {
    /// Serialized URL after redirects.
    pub url: String,
    pub root: RouteSnapshot,
}

impl RouterStateSnapshot {
    pub fn new(url: impl Into<String>, root: RouteSnapshot) -> Self {
        Self {
            url: url.into(),
            root,
        }
    }

    /// Parameters of the deepest activated route.
    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.root.leaf().params
    }
}
