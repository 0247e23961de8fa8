//! Navigation Engine contract consumed by the bridge.

use std::sync::Arc;

use crate::subscription::Subscription;

use super::event::RouterEvent;
use super::snapshot::RouterStateSnapshot;

/// Value a pre-activation hook hands back to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreactivationSignal {
    /// Continue to activation.
    Proceed,
    /// Abort the navigation; the engine reports it as canceled.
    Halt,
}

/// Interceptor run after recognition, before the new route is committed.
pub type PreactivationHook = Arc<dyn Fn(&RouterStateSnapshot) -> PreactivationSignal + Send + Sync>;

pub type RouterEventListener = Arc<dyn Fn(&RouterEvent) + Send + Sync>;

/// A router that owns the current location and reports lifecycle events.
///
/// Implementations must deliver hook calls and events one at a time, in
/// order, on a single logical execution context.
pub trait NavigationEngine: Send + Sync {
    /// Current committed URL.
    fn url(&self) -> String;

    /// Request a navigation. Fire-and-forget: the outcome is reported on the
    /// event stream.
    fn navigate_by_url(&self, url: &str);

    /// Install (or with `None`, remove) the pre-activation hook.
    fn set_before_preactivation(&self, hook: Option<PreactivationHook>);

    fn subscribe(&self, listener: RouterEventListener) -> Subscription;
}
