//! Observer registry and notification.

use crate::types::Snapshot;
use parking_lot::RwLock;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::types::{Observer, Subscription, SubscriptionId};

/// A registered observer.
struct Registered {
    id: SubscriptionId,
    observer: Arc<Observer>,
}

/// Insertion-ordered set of observers.
pub struct ObserverRegistry {
    /// Registrations in subscription order.
    observers: RwLock<Vec<Registered>>,
    /// Counter for generating subscription IDs.
    next_id: AtomicU64,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self {
            observers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Append an observer and return a handle for removing it.
    pub fn subscribe(self: &Arc<Self>, observer: Arc<Observer>) -> Subscription {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.observers.write().push(Registered { id, observer });
        Subscription::new(id, Arc::downgrade(self))
    }

    /// Remove one registration. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.observers.write();
        let before = observers.len();
        observers.retain(|r| r.id != id);
        observers.len() != before
    }

    /// Remove every registration of `observer`, compared by identity.
    /// Returns how many were removed.
    pub fn unsubscribe_observer(&self, observer: &Arc<Observer>) -> usize {
        let mut observers = self.observers.write();
        let before = observers.len();
        observers.retain(|r| !Arc::ptr_eq(&r.observer, observer));
        before - observers.len()
    }

    pub fn contains(&self, id: SubscriptionId) -> bool {
        self.observers.read().iter().any(|r| r.id == id)
    }

    /// Number of live registrations.
    pub fn len(&self) -> usize {
        self.observers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.read().is_empty()
    }

    /// Call every observer with `snapshot`, in subscription order.
    ///
    /// The list is copied before the first call, so observers may subscribe
    /// or unsubscribe while being notified; such changes take effect from
    /// the next update. A panicking observer does not stop the others.
    /// Returns the number of observers that panicked.
    pub fn notify(&self, snapshot: &Snapshot) -> usize {
        let observers: Vec<Arc<Observer>> = self
            .observers
            .read()
            .iter()
            .map(|r| Arc::clone(&r.observer))
            .collect();

        let mut failed = 0;
        for observer in observers {
            if panic::catch_unwind(AssertUnwindSafe(|| observer(snapshot))).is_err() {
                failed += 1;
            }
        }
        failed
    }
}

impl Default for ObserverRegistry {
    fn default() -> Self {
        Self::new()
    }
}
