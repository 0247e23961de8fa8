//! Per-navigation state machine tracked by the bridge.
//!
//! ```text
//! Idle ──Recognized──→ AwaitingCommit ──hook──→ Committed
//!                            │
//!                            ├──cancel──→ Canceled
//!                            └──error───→ Errored
//! ```
//!
//! Terminal phases accept a new `Recognized` for the next attempt. Cancel
//! and error are also accepted from any phase: an attempt can fail before
//! recognition.

use std::marker::PhantomData;

use serde_json::Value;

use crate::mvi::{Action, Reducer, StoreState};
use crate::router::{NavigationId, RoutesRecognized};

#[derive(Debug, Clone, PartialEq)]
pub enum NavigationPhase<T> {
    Idle,
    AwaitingCommit {
        recognized: RoutesRecognized,
        router_state: T,
        /// Store state when the attempt was recognized.
        store_state: Value,
    },
    Committed {
        id: NavigationId,
    },
    Canceled {
        id: NavigationId,
    },
    Errored {
        id: NavigationId,
    },
}

impl<T> Default for NavigationPhase<T> {
    fn default() -> Self {
        NavigationPhase::Idle
    }
}

impl<T: Clone + PartialEq + Send + 'static> StoreState for NavigationPhase<T> {}

impl<T> NavigationPhase<T> {
    /// The recognized event of the attempt awaiting commit.
    pub fn recognized(&self) -> Option<&RoutesRecognized> {
        match self {
            NavigationPhase::AwaitingCommit { recognized, .. } => Some(recognized),
            _ => None,
        }
    }

    pub fn navigation_id(&self) -> Option<NavigationId> {
        match self {
            NavigationPhase::Idle => None,
            NavigationPhase::AwaitingCommit { recognized, .. } => Some(recognized.id),
            NavigationPhase::Committed { id }
            | NavigationPhase::Canceled { id }
            | NavigationPhase::Errored { id } => Some(*id),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NavigationPhase::Idle => "idle",
            NavigationPhase::AwaitingCommit { .. } => "awaiting_commit",
            NavigationPhase::Committed { .. } => "committed",
            NavigationPhase::Canceled { .. } => "canceled",
            NavigationPhase::Errored { .. } => "errored",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PhaseAction<T> {
    Recognized {
        recognized: RoutesRecognized,
        router_state: T,
        store_state: Value,
    },
    Committed,
    Canceled(NavigationId),
    Errored(NavigationId),
}

impl<T: Send + 'static> Action for PhaseAction<T> {}

pub struct PhaseReducer<T>(PhantomData<fn() -> T>);

impl<T: Clone + PartialEq + Send + 'static> Reducer for PhaseReducer<T> {
    type State = NavigationPhase<T>;
    type Action = PhaseAction<T>;

    fn reduce(state: Self::State, action: &Self::Action) -> Self::State {
        match action {
            PhaseAction::Recognized {
                recognized,
                router_state,
                store_state,
            } => NavigationPhase::AwaitingCommit {
                recognized: recognized.clone(),
                router_state: router_state.clone(),
                store_state: store_state.clone(),
            },
            PhaseAction::Committed => match state {
                NavigationPhase::AwaitingCommit { recognized, .. } => NavigationPhase::Committed {
                    id: recognized.id,
                },
                // A commit without recognition has nothing to attach to.
                other => other,
            },
            PhaseAction::Canceled(id) => NavigationPhase::Canceled { id: *id },
            PhaseAction::Errored(id) => NavigationPhase::Errored { id: *id },
        }
    }
}
