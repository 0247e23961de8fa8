//! Listener registration shared by the in-process store and router.
//!
//! Listeners are stored behind an `Arc<Mutex<_>>` and are always cloned out
//! before being invoked, so a listener may subscribe, unsubscribe or trigger
//! further notifications without deadlocking.

use std::sync::Arc;

use parking_lot::Mutex;

/// Handle returned by `subscribe`. Dropping it removes the listener.
#[must_use = "dropping a Subscription unsubscribes the listener"]
pub struct Subscription {
    teardown: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Create a subscription that runs `teardown` exactly once on unsubscribe.
    pub fn new<F>(teardown: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            teardown: Some(Box::new(teardown)),
        }
    }

    /// A subscription with nothing to tear down.
    pub fn empty() -> Self {
        Self { teardown: None }
    }

    /// Remove the listener now.
    pub fn unsubscribe(mut self) {
        self.run_teardown();
    }

    fn run_teardown(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_teardown();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.teardown.is_some())
            .finish()
    }
}

struct Listeners<L> {
    next_id: u64,
    entries: Vec<(u64, L)>,
}

/// Ordered set of listeners of type `L` (usually an `Arc<dyn Fn(..)>`).
pub struct ListenerSet<L> {
    inner: Arc<Mutex<Listeners<L>>>,
}

impl<L: Clone + Send + 'static> ListenerSet<L> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Listeners {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Register a listener. It stays registered until the returned
    /// subscription is dropped or the set itself is dropped.
    pub fn add(&self, listener: L) -> Subscription {
        let id = {
            let mut listeners = self.inner.lock();
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners.entries.push((id, listener));
            id
        };

        let weak = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.lock().entries.retain(|(entry_id, _)| *entry_id != id);
            }
        })
    }

    /// Clone the current listeners in registration order.
    pub fn snapshot(&self) -> Vec<L> {
        self.inner
            .lock()
            .entries
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<L: Clone + Send + 'static> Default for ListenerSet<L> {
    fn default() -> Self {
        Self::new()
    }
}
