//! Base trait for actions dispatched into a store.

/// Marker trait for action objects.
///
/// Actions represent:
/// - Navigation lifecycle outcomes reported by the bridge
/// - Host application updates
/// - State restoration (replay, undo)
///
/// Actions are processed by reducers to produce new states.
pub trait Action: Send + 'static {}
