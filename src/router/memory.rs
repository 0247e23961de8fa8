//! In-process navigation engine.
//!
//! Navigation requests go through a single-consumer queue: a request issued
//! while another navigation is running (for example from a listener reacting
//! to that navigation's events) is run after the current one finishes. Hook
//! calls and events are therefore never re-entrant for a given router.

use std::collections::VecDeque;

use parking_lot::Mutex;
use scopeguard::defer;

use crate::subscription::{ListenerSet, Subscription};

use super::engine::{NavigationEngine, PreactivationHook, PreactivationSignal, RouterEventListener};
use super::event::{
    NavigationCancel, NavigationEnd, NavigationError, NavigationId, NavigationStart, RouterEvent,
    RoutesRecognized,
};
use super::routes::RouteTable;

struct RouterInner {
    url: String,
    next_id: u64,
    queue: VecDeque<String>,
    draining: bool,
    history: Vec<RouterEvent>,
}

/// Router over a static [`RouteTable`].
///
/// Pipeline for each request: `NavigationStart` → match (no match →
/// `NavigationError`) → `RoutesRecognized` → guard (deny →
/// `NavigationCancel`) → resolver (failure → `NavigationError`) →
/// pre-activation hook (`Halt` → `NavigationCancel`) → commit →
/// `NavigationEnd`.
pub struct MemoryRouter {
    routes: RouteTable,
    inner: Mutex<RouterInner>,
    hook: Mutex<Option<PreactivationHook>>,
    listeners: ListenerSet<RouterEventListener>,
}

impl MemoryRouter {
    /// New router positioned at `/` with no navigation performed yet.
    pub fn new(routes: RouteTable) -> Self {
        Self {
            routes,
            inner: Mutex::new(RouterInner {
                url: "/".to_string(),
                next_id: 1,
                queue: VecDeque::new(),
                draining: false,
                history: Vec::new(),
            }),
            hook: Mutex::new(None),
            listeners: ListenerSet::new(),
        }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Every event emitted so far, in order.
    pub fn events(&self) -> Vec<RouterEvent> {
        self.inner.lock().history.clone()
    }

    /// Number of navigations started for `url` (as requested, before redirects).
    pub fn navigations_to(&self, url: &str) -> usize {
        self.inner
            .lock()
            .history
            .iter()
            .filter(|event| matches!(event, RouterEvent::NavigationStart(start) if start.url == url))
            .count()
    }

    fn drain(&self) {
        {
            let mut inner = self.inner.lock();
            if inner.draining {
                return;
            }
            inner.draining = true;
        }
        defer! {
            self.inner.lock().draining = false;
        }

        loop {
            let next = self.inner.lock().queue.pop_front();
            let Some(url) = next else {
                break;
            };
            self.run_navigation(&url);
        }
    }

    fn run_navigation(&self, url: &str) {
        let id = {
            let mut inner = self.inner.lock();
            let id = NavigationId(inner.next_id);
            inner.next_id += 1;
            id
        };
        let span = tracing::debug_span!("navigation", navigation_id = %id, url = %url);
        let _enter = span.enter();

        self.emit(RouterEvent::NavigationStart(NavigationStart {
            id,
            url: url.to_string(),
        }));

        let recognition = match self.routes.recognize(url) {
            Ok(recognition) => recognition,
            Err(err) => {
                tracing::debug!(error = %err, "Navigation failed to match");
                self.emit(RouterEvent::NavigationError(NavigationError {
                    id,
                    url: url.to_string(),
                    error: err.to_string(),
                }));
                return;
            }
        };

        self.emit(RouterEvent::RoutesRecognized(RoutesRecognized {
            id,
            url: url.to_string(),
            url_after_redirects: recognition.url_after_redirects.clone(),
            state: recognition.snapshot.clone(),
        }));

        if !recognition.route.can_activate {
            self.emit(RouterEvent::NavigationCancel(NavigationCancel {
                id,
                url: url.to_string(),
                reason: format!("Guard rejected activation of '{}'", recognition.route.path),
            }));
            return;
        }

        if let Some(message) = &recognition.route.resolve_error {
            self.emit(RouterEvent::NavigationError(NavigationError {
                id,
                url: url.to_string(),
                error: message.clone(),
            }));
            return;
        }

        let hook = self.hook.lock().clone();
        if let Some(hook) = hook {
            if hook(&recognition.snapshot) == PreactivationSignal::Halt {
                self.emit(RouterEvent::NavigationCancel(NavigationCancel {
                    id,
                    url: url.to_string(),
                    reason: "Pre-activation hook halted navigation".to_string(),
                }));
                return;
            }
        }

        self.inner.lock().url = recognition.url_after_redirects.clone();
        tracing::debug!(committed = %recognition.url_after_redirects, "Navigation committed");

        self.emit(RouterEvent::NavigationEnd(NavigationEnd {
            id,
            url: url.to_string(),
            url_after_redirects: recognition.url_after_redirects,
        }));
    }

    fn emit(&self, event: RouterEvent) {
        tracing::trace!(event = event.kind(), navigation_id = %event.id(), "Router event");
        self.inner.lock().history.push(event.clone());
        for listener in self.listeners.snapshot() {
            listener(&event);
        }
    }
}

impl NavigationEngine for MemoryRouter {
    fn url(&self) -> String {
        self.inner.lock().url.clone()
    }

    fn navigate_by_url(&self, url: &str) {
        self.inner.lock().queue.push_back(url.to_string());
        self.drain();
    }

    fn set_before_preactivation(&self, hook: Option<PreactivationHook>) {
        *self.hook.lock() = hook;
    }

    fn subscribe(&self, listener: RouterEventListener) -> Subscription {
        self.listeners.add(listener)
    }
}
