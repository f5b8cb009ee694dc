//! Subscription types.

use crate::types::Snapshot;
use std::sync::Weak;

use super::manager::ObserverRegistry;

/// A callback invoked with each new snapshot.
pub type Observer = dyn Fn(&Snapshot) + Send + Sync;

/// Unique identifier for a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Handle returned by `subscribe`.
///
/// Dropping the handle does not unsubscribe. The handle only holds a weak
/// reference to the registry, so it never keeps a store alive.
#[derive(Clone, Debug)]
pub struct Subscription {
    pub id: SubscriptionId,
    registry: Weak<ObserverRegistry>,
}

impl Subscription {
    pub(crate) fn new(id: SubscriptionId, registry: Weak<ObserverRegistry>) -> Self {
        Self { id, registry }
    }

    /// Remove this registration. Idempotent.
    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.unsubscribe(self.id);
        }
    }

    /// Whether this registration is still live.
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .map(|registry| registry.contains(self.id))
            .unwrap_or(false)
    }
}
