use std::any::Any;
use std::collections::VecDeque;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::error::SubscriberFailure;

static NEXT_SUBSCRIBER_ID: AtomicU64 = AtomicU64::new(0);

/// Unique identifier of a subscription, shared across every channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl SubscriberId {
    pub(crate) fn next() -> Self {
        Self(NEXT_SUBSCRIBER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub(crate) type Callback<T> = Box<dyn Fn(&T) + Send + Sync>;

struct Entry<T> {
    id: SubscriberId,
    // Cleared on unsubscribe so a round already in flight skips the entry.
    active: AtomicBool,
    callback: Callback<T>,
}

struct Pending<T> {
    queue: VecDeque<T>,
    running: bool,
}

/// Synchronous fan-out of values to an ordered list of subscribers.
///
/// Values emitted while a dispatch loop is running (a subscriber emitting on
/// the channel it is being notified by) are queued and delivered by that
/// loop once the current round finishes, so rounds never interleave.
pub(crate) struct Dispatcher<T> {
    name: &'static str,
    subscribers: RwLock<Vec<Arc<Entry<T>>>>,
    pending: Mutex<Pending<T>>,
}

impl<T> Dispatcher<T> {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            subscribers: RwLock::new(Vec::new()),
            pending: Mutex::new(Pending {
                queue: VecDeque::new(),
                running: false,
            }),
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn subscribe(&self, callback: Callback<T>) -> SubscriberId {
        let id = SubscriberId::next();
        self.subscribers.write().push(Arc::new(Entry {
            id,
            active: AtomicBool::new(true),
            callback,
        }));
        tracing::debug!(channel = self.name, subscriber = %id, "subscribed");
        id
    }

    pub(crate) fn unsubscribe(&self, id: SubscriberId) -> bool {
        // The entry must be dropped after the guard: its callback may own
        // subscriptions to this same channel.
        let removed = {
            let mut subscribers = self.subscribers.write();
            subscribers
                .iter()
                .position(|entry| entry.id == id)
                .map(|index| subscribers.remove(index))
        };

        match removed {
            Some(entry) => {
                entry.active.store(false, Ordering::Release);
                tracing::debug!(channel = self.name, subscriber = %id, "unsubscribed");
                true
            }
            None => false,
        }
    }

    pub(crate) fn contains(&self, id: SubscriberId) -> bool {
        self.subscribers.read().iter().any(|entry| entry.id == id)
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    /// Deliver `value` to every subscriber, in subscription order.
    ///
    /// Returns the failures observed by the loop run from this call. When the
    /// value is queued behind a running loop the result is empty; the running
    /// loop reports those failures instead.
    pub(crate) fn dispatch(&self, value: T) -> Vec<SubscriberFailure> {
        {
            let mut pending = self.pending.lock();
            pending.queue.push_back(value);
            if pending.running {
                tracing::debug!(
                    channel = self.name,
                    queued = pending.queue.len(),
                    "deferring reentrant emission"
                );
                return Vec::new();
            }
            pending.running = true;
        }

        let mut failures = Vec::new();
        loop {
            let value = {
                let mut pending = self.pending.lock();
                match pending.queue.pop_front() {
                    Some(value) => value,
                    None => {
                        pending.running = false;
                        break;
                    }
                }
            };
            self.deliver(&value, &mut failures);
        }
        failures
    }

    fn deliver(&self, value: &T, failures: &mut Vec<SubscriberFailure>) {
        // Snapshot so callbacks may subscribe or unsubscribe without deadlocking.
        let subscribers: Vec<Arc<Entry<T>>> = self.subscribers.read().clone();
        tracing::trace!(
            channel = self.name,
            subscribers = subscribers.len(),
            "dispatching"
        );

        for entry in subscribers {
            if !entry.active.load(Ordering::Acquire) {
                continue;
            }
            let result = panic::catch_unwind(AssertUnwindSafe(|| (entry.callback)(value)));
            if let Err(payload) = result {
                let message = panic_message(&*payload);
                tracing::error!(
                    channel = self.name,
                    subscriber = %entry.id,
                    %message,
                    "subscriber panicked; continuing dispatch"
                );
                failures.push(SubscriberFailure {
                    subscriber: entry.id,
                    message,
                });
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
