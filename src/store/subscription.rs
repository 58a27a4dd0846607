use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::error::ListenerError;

pub(crate) type Listener = Arc<dyn Fn() -> Result<(), ListenerError> + Send + Sync>;

/// One call to `subscribe`. Subscribing the same callback twice yields two
/// independent registrations.
#[derive(Clone)]
pub(crate) struct Registration {
    id: u64,
    active: Arc<AtomicBool>,
    callback: Listener,
}

impl Registration {
    pub(crate) fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub(crate) fn call(&self) -> Result<(), ListenerError> {
        (self.callback)()
    }
}

/// Listener set shared by every handle to one store.
pub(crate) struct ListenerRegistry {
    next_id: AtomicU64,
    entries: Mutex<Vec<Registration>>,
}

impl ListenerRegistry {
    pub(crate) fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            entries: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn register(self: &Arc<Self>, callback: Listener) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let active = Arc::new(AtomicBool::new(true));
        self.entries.lock().push(Registration {
            id,
            active: Arc::clone(&active),
            callback,
        });
        log::debug!("store::subscribe: registered listener {}", id);

        Subscription {
            id,
            active,
            registry: Arc::downgrade(self),
        }
    }

    fn remove(&self, id: u64) {
        let mut entries = self.entries.lock();
        if let Some(pos) = entries.iter().position(|entry| entry.id == id) {
            let entry = entries.remove(pos);
            entry.active.store(false, Ordering::Release);
            log::debug!("store::unsubscribe: removed listener {}", id);
        }
    }

    /// Registrations in subscription order, as of now.
    pub(crate) fn snapshot(&self) -> Vec<Registration> {
        self.entries.lock().clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

/// Handle returned by [`Store::subscribe`](crate::Store::subscribe).
///
/// Dropping a `Subscription` does **not** remove the listener; call
/// [`unsubscribe`](Subscription::unsubscribe), or convert it with
/// [`into_guard`](Subscription::into_guard) to tie the registration to a scope.
#[must_use = "dropping a Subscription leaves the listener registered forever"]
pub struct Subscription {
    id: u64,
    active: Arc<AtomicBool>,
    registry: Weak<ListenerRegistry>,
}

impl Subscription {
    /// Remove this registration from the store.
    ///
    /// Calling it again, or after the store has been dropped, does nothing.
    /// If a dispatch is notifying listeners right now, this listener is skipped
    /// unless its turn has already come.
    pub fn unsubscribe(&self) {
        if !self.active.swap(false, Ordering::AcqRel) {
            return;
        }
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }

    /// Whether the listener is still registered.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire) && self.registry.strong_count() > 0
    }

    /// Unsubscribe automatically when the returned guard is dropped.
    pub fn into_guard(self) -> SubscriptionGuard {
        SubscriptionGuard { subscription: self }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

/// RAII guard for a store subscription.
#[derive(Debug)]
pub struct SubscriptionGuard {
    subscription: Subscription,
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.subscription.unsubscribe();
    }
}
