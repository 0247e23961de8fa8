//! Navigation lifecycle events.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::snapshot::RouterStateSnapshot;

/// Identifier the engine assigns to each navigation attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NavigationId(pub u64);

impl fmt::Display for NavigationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationStart {
    pub id: NavigationId,
    pub url: String,
}

/// Navigation target identified, not yet committed.
///
/// `state` is the engine's snapshot for events coming out of the engine, and
/// the serialized router state for events embedded in a `ROUTER_NAVIGATION`
/// payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutesRecognized<S = RouterStateSnapshot> {
    pub id: NavigationId,
    pub url: String,
    pub url_after_redirects: String,
    pub state: S,
}

impl<S> RoutesRecognized<S> {
    /// Same event with a different state representation.
    pub fn with_state<T>(&self, state: T) -> RoutesRecognized<T> {
        RoutesRecognized {
            id: self.id,
            url: self.url.clone(),
            url_after_redirects: self.url_after_redirects.clone(),
            state,
        }
    }
}

/// Navigation aborted, e.g. by a guard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationCancel {
    pub id: NavigationId,
    pub url: String,
    pub reason: String,
}

/// Navigation failed, e.g. no route matched or a resolver errored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationError {
    pub id: NavigationId,
    pub url: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationEnd {
    pub id: NavigationId,
    pub url: String,
    pub url_after_redirects: String,
}

/// Everything the engine emits on its event stream.
///
/// For a given id, `RoutesRecognized` precedes any `NavigationCancel` or
/// `NavigationError`, and at most one of `NavigationCancel`,
/// `NavigationError`, `NavigationEnd` is emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RouterEvent {
    NavigationStart(NavigationStart),
    RoutesRecognized(RoutesRecognized),
    NavigationCancel(NavigationCancel),
    NavigationError(NavigationError),
    NavigationEnd(NavigationEnd),
}

impl RouterEvent {
    pub fn id(&self) -> NavigationId {
        match self {
            RouterEvent::NavigationStart(e) => e.id,
            RouterEvent::RoutesRecognized(e) => e.id,
            RouterEvent::NavigationCancel(e) => e.id,
            RouterEvent::NavigationError(e) => e.id,
            RouterEvent::NavigationEnd(e) => e.id,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            RouterEvent::NavigationStart(e) => &e.url,
            RouterEvent::RoutesRecognized(e) => &e.url,
            RouterEvent::NavigationCancel(e) => &e.url,
            RouterEvent::NavigationError(e) => &e.url,
            RouterEvent::NavigationEnd(e) => &e.url,
        }
    }

    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RouterEvent::NavigationStart(_) => "NavigationStart",
            RouterEvent::RoutesRecognized(_) => "RoutesRecognized",
            RouterEvent::NavigationCancel(_) => "NavigationCancel",
            RouterEvent::NavigationError(_) => "NavigationError",
            RouterEvent::NavigationEnd(_) => "NavigationEnd",
        }
    }

    /// True for cancel, error and end.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RouterEvent::NavigationCancel(_)
                | RouterEvent::NavigationError(_)
                | RouterEvent::NavigationEnd(_)
        )
    }
}
