//! Base trait for reducer-owned state.

/// Marker trait for state held in a store slot.
///
/// States should be:
/// - Immutable (Clone to create new states)
/// - Comparable (PartialEq for detecting changes)
/// - Constructible empty (Default is the "slot not yet written" value)
pub trait StoreState: Clone + PartialEq + Default + Send + 'static {}
