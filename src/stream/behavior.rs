use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::SubscriberFailure;
use crate::stream::{Subject, Subscription};

/// A replaying broadcast stream that always holds a current value.
///
/// New subscribers are called with the current value straight away, then
/// with every value set afterwards. Values are kept as `Arc<T>` snapshots so
/// each emission hands out an immutable copy that outlives later updates.
pub struct BehaviorSubject<T> {
    current: Arc<RwLock<Snapshot<T>>>,
    changes: Subject<Snapshot<T>>,
}

/// A value together with the position it holds in the sequence of updates.
struct Snapshot<T> {
    version: u64,
    value: Arc<T>,
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self {
            version: self.version,
            value: Arc::clone(&self.value),
        }
    }
}

impl<T: Send + Sync + 'static> BehaviorSubject<T> {
    /// Create a subject holding `initial`.
    pub fn new(initial: T) -> Self {
        Self::named("behavior", initial)
    }

    /// Create a named subject holding `initial`.
    pub fn named(name: &'static str, initial: T) -> Self {
        let snapshot = Snapshot {
            version: 0,
            value: Arc::new(initial),
        };
        Self {
            current: Arc::new(RwLock::new(snapshot)),
            changes: Subject::named(name),
        }
    }

    /// Diagnostic name, shared with the underlying change stream.
    pub fn name(&self) -> &'static str {
        self.changes.name()
    }

    /// The current snapshot.
    pub fn value(&self) -> Arc<T> {
        Arc::clone(&self.current.read().value)
    }

    /// Read the current value without cloning the snapshot handle.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let current = self.current.read();
        f(&current.value)
    }

    /// Subscribe, replaying the current value to `callback` immediately.
    ///
    /// Updates that were already queued when the subscription was made are
    /// covered by the replay and are not delivered a second time.
    ///
    /// The replay runs on the caller's stack, so a panic there propagates to
    /// the caller and the subscription is dropped with it.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let replayed = self.current.read().clone();
        let callback = Arc::new(callback);
        let listener = Arc::clone(&callback);
        let subscription = self.changes.subscribe(move |snapshot: &Snapshot<T>| {
            if snapshot.version > replayed.version {
                listener(&snapshot.value);
            }
        });
        callback(&replayed.value);
        subscription
    }

    /// Replace the current value and broadcast it.
    pub fn set(&self, value: T) {
        self.replace_with(|_| value);
    }

    /// Compute the next value from the current one, store it, then broadcast.
    ///
    /// The write lock is released before any subscriber runs, so callbacks
    /// observe the new value through [`value`](Self::value).
    pub(crate) fn replace_with(&self, f: impl FnOnce(&T) -> T) -> Vec<SubscriberFailure> {
        let next = {
            let mut current = self.current.write();
            let next = Snapshot {
                version: current.version + 1,
                value: Arc::new(f(&current.value)),
            };
            *current = next.clone();
            next
        };
        self.changes.dispatch(next)
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.changes.subscriber_count()
    }
}

impl<T> Clone for BehaviorSubject<T> {
    fn clone(&self) -> Self {
        Self {
            current: Arc::clone(&self.current),
            changes: self.changes.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for BehaviorSubject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorSubject")
            .field("value", &*self.current.read().value)
            .field("changes", &self.changes)
            .finish()
    }
}
