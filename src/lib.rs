//! Two-way synchronization between a client-side router and a
//! single-state-tree store.
//!
//! The [`connector::StoreRouterConnector`] records every router navigation
//! in a reserved store slot, and navigates the router whenever that slot is
//! changed by something other than the router itself (devtools time travel,
//! state restore, host actions).

pub mod config;
pub mod connector;
pub mod logging;
pub mod mvi;
pub mod router;
pub mod scenario;
pub mod serializer;
pub mod store;
pub mod subscription;

pub use config::{Config, ConfigError, RouterStoreConfig, SerializerKind};
pub use connector::StoreRouterConnector;
pub use router::{MemoryRouter, NavigationEngine};
pub use serializer::{
    DefaultRouterStateSerializer, MinimalRouterStateSerializer, RouterStateSerializer,
};
pub use store::{MemoryStore, RouterAction, StateStore};
