use std::fmt;
use std::sync::Weak;

use crate::runtime::{Dispatcher, SubscriberId};

/// Type-erased handle back to the channel that owns a subscription.
pub(crate) trait Unsubscribe: Send + Sync {
    fn unsubscribe(&self, id: SubscriberId) -> bool;
    fn contains(&self, id: SubscriberId) -> bool;
}

impl<T: Send> Unsubscribe for Dispatcher<T> {
    fn unsubscribe(&self, id: SubscriberId) -> bool {
        Dispatcher::unsubscribe(self, id)
    }

    fn contains(&self, id: SubscriberId) -> bool {
        Dispatcher::contains(self, id)
    }
}

/// RAII guard for a stream subscription.
///
/// Dropping the guard unsubscribes immediately: the callback is not invoked
/// again, not even by a dispatch round that is already in progress.
#[must_use = "dropping a Subscription unsubscribes it; call `detach` to keep it alive"]
pub struct Subscription {
    id: SubscriberId,
    source: Option<Weak<dyn Unsubscribe>>,
}

impl Subscription {
    pub(crate) fn new(id: SubscriberId, source: Weak<dyn Unsubscribe>) -> Self {
        Self {
            id,
            source: Some(source),
        }
    }

    /// Identifier of this subscription.
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Whether the callback is still registered with its channel.
    pub fn is_active(&self) -> bool {
        self.source
            .as_ref()
            .and_then(Weak::upgrade)
            .is_some_and(|source| source.contains(self.id))
    }

    /// Stop receiving values. Equivalent to dropping the guard.
    pub fn unsubscribe(self) {}

    /// Keep the callback registered for as long as the channel lives.
    ///
    /// This is how a store wires its actions in its constructor.
    pub fn detach(mut self) {
        self.source = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(source) = self.source.take().and_then(|source| source.upgrade()) {
            source.unsubscribe(self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("detached", &self.source.is_none())
            .finish()
    }
}
