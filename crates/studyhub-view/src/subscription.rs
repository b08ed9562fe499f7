//! Listener registry for navigation changes.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use dashmap::DashMap;
use tracing::debug;

use crate::navigation::Navigation;

type Listener = Arc<dyn Fn(&Navigation) + Send + Sync>;

#[derive(Default)]
struct RegistryInner {
    listeners: DashMap<u64, Listener>,
    next_id: AtomicU64,
}

/// Registered listeners, called synchronously in subscription order.
#[derive(Clone, Default)]
pub struct ListenerRegistry {
    inner: Arc<RegistryInner>,
}

impl ListenerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Navigation) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst);
        self.inner.listeners.insert(id, Arc::new(listener));
        debug!(subscription = id, "Listener subscribed");
        Subscription {
            id,
            registry: Some(Arc::downgrade(&self.inner)),
        }
    }

    /// Call every listener with `state`. Returns how many were called.
    ///
    /// The listener set is copied out first, so a listener may subscribe
    /// or unsubscribe while being called.
    pub fn notify(&self, state: &Navigation) -> usize {
        let mut listeners: Vec<(u64, Listener)> = self
            .inner
            .listeners
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        listeners.sort_by_key(|(id, _)| *id);

        for (_, listener) in &listeners {
            listener(state);
        }
        listeners.len()
    }

    /// Number of active listeners.
    pub fn len(&self) -> usize {
        self.inner.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.listeners.is_empty()
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.len())
            .finish()
    }
}

/// Handle returned by [`ListenerRegistry::subscribe`].
///
/// The listener stays registered while the handle is alive; dropping the
/// handle unsubscribes it.
#[derive(Debug)]
#[must_use = "dropping a Subscription unsubscribes its listener immediately"]
pub struct Subscription {
    id: u64,
    registry: Option<Weak<RegistryInner>>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Remove the listener. Returns `false` if it was already gone.
    pub fn unsubscribe(mut self) -> bool {
        self.detach()
    }

    fn detach(&mut self) -> bool {
        let Some(registry) = self.registry.take() else {
            return false;
        };
        let removed = registry
            .upgrade()
            .is_some_and(|inner| inner.listeners.remove(&self.id).is_some());
        debug!(subscription = self.id, removed, "Listener unsubscribed");
        removed
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_listeners_called_in_order() {
        let registry = ListenerRegistry::new();
        let calls = Arc::new(Mutex::new(Vec::new()));

        let c = calls.clone();
        let _first = registry.subscribe(move |_| c.lock().push("first"));
        let c = calls.clone();
        let _second = registry.subscribe(move |_| c.lock().push("second"));

        assert_eq!(registry.notify(&Navigation::Dashboard), 2);
        assert_eq!(*calls.lock(), vec!["first", "second"]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let registry = ListenerRegistry::new();
        let calls = Arc::new(Mutex::new(0));

        let c = calls.clone();
        let sub = registry.subscribe(move |_| *c.lock() += 1);
        registry.notify(&Navigation::Dashboard);
        assert!(sub.unsubscribe());
        registry.notify(&Navigation::Dashboard);

        assert_eq!(*calls.lock(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_dropping_handle_unsubscribes() {
        let registry = ListenerRegistry::new();
        let calls = Arc::new(Mutex::new(0));

        let c = calls.clone();
        let sub = registry.subscribe(move |_| *c.lock() += 1);
        registry.notify(&Navigation::Dashboard);
        drop(sub);
        registry.notify(&Navigation::Dashboard);

        assert_eq!(*calls.lock(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_listener_may_unsubscribe_itself() {
        let registry = ListenerRegistry::new();
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let calls = Arc::new(Mutex::new(0));

        let s = slot.clone();
        let c = calls.clone();
        let sub = registry.subscribe(move |_| {
            *c.lock() += 1;
            if let Some(sub) = s.lock().take() {
                sub.unsubscribe();
            }
        });
        *slot.lock() = Some(sub);

        registry.notify(&Navigation::Dashboard);
        registry.notify(&Navigation::Dashboard);
        assert_eq!(*calls.lock(), 1);
    }
}
