//! Navigation Engine side: snapshots, lifecycle events, the engine contract
//! and an in-process router implementing it.

mod engine;
mod event;
mod memory;
mod routes;
mod snapshot;

pub use engine::{NavigationEngine, PreactivationHook, PreactivationSignal, RouterEventListener};
pub use event::{
    NavigationCancel, NavigationEnd, NavigationError, NavigationId, NavigationStart, RouterEvent,
    RoutesRecognized,
};
pub use memory::MemoryRouter;
pub use routes::{ParsedUrl, Recognition, Route, RouteError, RouteTable};
pub use snapshot::{RouteSnapshot, RouterStateSnapshot};
