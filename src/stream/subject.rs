use std::fmt;
use std::sync::{Arc, Weak};

use crate::error::{DispatchError, SubscriberFailure};
use crate::runtime::Dispatcher;
use crate::stream::subscription::{Subscription, Unsubscribe};

/// A non-replaying broadcast stream.
///
/// Subscribers receive every value emitted after they subscribed, in
/// subscription order. Nothing is cached: emitting with no subscribers drops
/// the value, and a late subscriber sees nothing until the next emission.
///
/// Cloning a `Subject` yields another handle to the same channel.
///
/// # Examples
///
/// ```
/// use cachet::stream::Subject;
/// use std::sync::{Arc, Mutex};
///
/// let subject = Subject::new();
/// subject.emit(1); // nobody listening, dropped
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let seen_clone = seen.clone();
/// let _sub = subject.subscribe(move |value: &i32| seen_clone.lock().unwrap().push(*value));
///
/// subject.emit(2);
/// assert_eq!(*seen.lock().unwrap(), vec![2]);
/// ```
pub struct Subject<T> {
    dispatcher: Arc<Dispatcher<T>>,
}

impl<T: Send + 'static> Subject<T> {
    /// Create a new subject with a generic diagnostic name.
    pub fn new() -> Self {
        Self::named("subject")
    }

    /// Create a new subject whose name tags its log events.
    pub fn named(name: &'static str) -> Self {
        Self {
            dispatcher: Arc::new(Dispatcher::new(name)),
        }
    }

    /// Diagnostic name of this subject.
    pub fn name(&self) -> &'static str {
        self.dispatcher.name()
    }

    /// Register a callback for every subsequent emission.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.dispatcher.subscribe(Box::new(callback));
        let weak: Weak<Dispatcher<T>> = Arc::downgrade(&self.dispatcher);
        let source: Weak<dyn Unsubscribe> = weak;
        Subscription::new(id, source)
    }

    /// Broadcast `value` to all current subscribers.
    ///
    /// Panicking subscribers are logged and skipped; the rest are still
    /// notified.
    pub fn emit(&self, value: T) {
        self.dispatch(value);
    }

    /// Broadcast `value`, reporting subscribers that panicked.
    pub fn try_emit(&self, value: T) -> Result<(), DispatchError> {
        DispatchError::check(self.name(), self.dispatch(value))
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.dispatcher.subscriber_count()
    }

    pub(crate) fn dispatch(&self, value: T) -> Vec<SubscriberFailure> {
        self.dispatcher.dispatch(value)
    }
}

impl<T: Send + 'static> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: Arc::clone(&self.dispatcher),
        }
    }
}

impl<T> fmt::Debug for Subject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subject")
            .field("name", &self.dispatcher.name())
            .field("subscribers", &self.dispatcher.subscriber_count())
            .finish()
    }
}
