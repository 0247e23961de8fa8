//! Reentrancy guards between the two synchronization directions.

/// A store-driven navigation the bridge has asked the engine to perform and
/// whose pre-activation has not been seen yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingNavigation {
    pub token: u64,
    pub url: String,
}

/// A slot URL the bridge has already acted on, and where that left the
/// router. While the slot still holds `slot_url` and the router is at
/// `router_url`, the slot needs no further navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettledNavigation {
    pub slot_url: String,
    pub router_url: String,
}

/// Both guard flags, as observed at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuardSnapshot {
    pub dispatch_triggered_by_router: bool,
    pub navigation_triggered_by_dispatch: bool,
}

impl GuardSnapshot {
    pub fn is_clear(&self) -> bool {
        !self.dispatch_triggered_by_router && !self.navigation_triggered_by_dispatch
    }
}

/// Guard state shared by the hook and both listeners.
///
/// `dispatch_triggered_by_router` is set for the duration of the bridge's own
/// store dispatch. The navigation guard is a tagged request: it remembers
/// which URL the bridge asked for, and only the pre-activation of that URL
/// consumes it. Ending a dispatch clears both.
#[derive(Debug, Default)]
pub struct SyncGuards {
    dispatch_triggered_by_router: bool,
    pending: Option<PendingNavigation>,
    next_token: u64,
    settled: Option<SettledNavigation>,
}

impl SyncGuards {
    pub fn begin_dispatch(&mut self) {
        self.dispatch_triggered_by_router = true;
    }

    pub fn end_dispatch(&mut self) {
        self.dispatch_triggered_by_router = false;
        self.pending = None;
    }

    pub fn is_dispatching(&self) -> bool {
        self.dispatch_triggered_by_router
    }

    /// Record a store-driven navigation request to `url`.
    pub fn request_navigation(&mut self, url: &str) -> PendingNavigation {
        self.next_token += 1;
        let pending = PendingNavigation {
            token: self.next_token,
            url: url.to_string(),
        };
        self.pending = Some(pending.clone());
        pending
    }

    pub fn pending(&self) -> Option<&PendingNavigation> {
        self.pending.as_ref()
    }

    /// Consume the outstanding request if it was issued for `url`.
    pub fn take_pending_for(&mut self, url: &str) -> Option<PendingNavigation> {
        if self.pending.as_ref().is_some_and(|pending| pending.url == url) {
            self.pending.take()
        } else {
            None
        }
    }

    /// Record that a slot holding `slot_url` was resolved with the router at
    /// `router_url`: the outcome of a canceled or failed attempt, or the
    /// target of a redirected store-driven navigation.
    pub fn settle(&mut self, slot_url: &str, router_url: &str) {
        self.settled = Some(SettledNavigation {
            slot_url: slot_url.to_string(),
            router_url: router_url.to_string(),
        });
    }

    pub fn clear_settled(&mut self) {
        self.settled = None;
    }

    /// Router URL recorded for `slot_url`, if that slot URL is settled.
    /// A slot holding any other URL forgets the record.
    pub fn settled_router_url(&mut self, slot_url: &str) -> Option<String> {
        match &self.settled {
            Some(settled) if settled.slot_url == slot_url => Some(settled.router_url.clone()),
            Some(_) => {
                self.settled = None;
                None
            }
            None => None,
        }
    }

    pub fn snapshot(&self) -> GuardSnapshot {
        GuardSnapshot {
            dispatch_triggered_by_router: self.dispatch_triggered_by_router,
            navigation_triggered_by_dispatch: self.pending.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_clear() {
        assert!(SyncGuards::default().snapshot().is_clear());
    }

    #[test]
    fn pending_is_consumed_only_by_matching_url() {
        let mut guards = SyncGuards::default();
        let pending = guards.request_navigation("/b");
        assert_eq!(pending.token, 1);

        assert!(guards.take_pending_for("/c").is_none());
        assert!(guards.snapshot().navigation_triggered_by_dispatch);

        assert_eq!(guards.take_pending_for("/b"), Some(pending));
        assert!(guards.snapshot().is_clear());
    }

    #[test]
    fn tokens_are_unique() {
        let mut guards = SyncGuards::default();
        let first = guards.request_navigation("/a");
        let second = guards.request_navigation("/a");
        assert_ne!(first.token, second.token);
        assert_eq!(guards.pending(), Some(&second));
    }

    #[test]
    fn settled_record_survives_only_while_slot_matches() {
        let mut guards = SyncGuards::default();
        guards.settle("/c", "/a");

        assert_eq!(guards.settled_router_url("/c").as_deref(), Some("/a"));
        assert_eq!(guards.settled_router_url("/b"), None);
        assert_eq!(guards.settled_router_url("/c"), None);
    }

    #[test]
    fn end_dispatch_keeps_settled_record() {
        let mut guards = SyncGuards::default();
        guards.settle("/old", "/a");
        guards.begin_dispatch();
        guards.end_dispatch();
        assert_eq!(guards.settled_router_url("/old").as_deref(), Some("/a"));
    }

    #[test]
    fn end_dispatch_clears_both() {
        let mut guards = SyncGuards::default();
        guards.request_navigation("/b");
        guards.begin_dispatch();
        assert!(guards.is_dispatching());

        guards.end_dispatch();
        assert!(guards.snapshot().is_clear());
    }
}
