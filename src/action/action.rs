use std::fmt;

use crate::error::DispatchError;
use crate::stream::{Observable, Subject, Subscription};

/// The listening side of an action: a live, non-replaying event stream.
///
/// Obtained from [`ActionWith::listen`] or [`Action::listen`].
pub struct EventStream<P> {
    events: Subject<P>,
}

impl<P: Send + 'static> EventStream<P> {
    /// Call `callback` for every execution made after this point.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        self.events.subscribe(callback)
    }
}

impl<P: Send + 'static> Observable for EventStream<P> {
    type Item = P;

    fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        EventStream::subscribe(self, callback)
    }
}

impl<P> Clone for EventStream<P> {
    fn clone(&self) -> Self {
        Self {
            events: self.events.clone(),
        }
    }
}

impl<P> fmt::Debug for EventStream<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EventStream").field(&self.events).finish()
    }
}

/// A named command carrying a payload of type `P`.
///
/// Executing broadcasts the payload synchronously to every current listener,
/// in the order they subscribed. Nothing is buffered: with no listeners the
/// execution is dropped, and a listener never sees executions that happened
/// before it subscribed.
///
/// # Examples
///
/// ```
/// use cachet::ActionWith;
/// use std::sync::{Arc, Mutex};
///
/// let rename: ActionWith<String> = ActionWith::named("rename");
/// let names = Arc::new(Mutex::new(Vec::new()));
///
/// let names_clone = names.clone();
/// let _sub = rename
///     .listen()
///     .subscribe(move |name: &String| names_clone.lock().unwrap().push(name.clone()));
///
/// rename.execute("ada".to_string());
/// assert_eq!(*names.lock().unwrap(), vec!["ada".to_string()]);
/// ```
pub struct ActionWith<P> {
    events: Subject<P>,
}

impl<P: Send + 'static> ActionWith<P> {
    /// Create an action with a generic diagnostic name.
    pub fn new() -> Self {
        Self::named("action")
    }

    /// Create an action whose name tags its log events.
    pub fn named(name: &'static str) -> Self {
        Self {
            events: Subject::named(name),
        }
    }

    /// Diagnostic name of this action.
    pub fn name(&self) -> &'static str {
        self.events.name()
    }

    /// A live stream of future executions.
    pub fn listen(&self) -> EventStream<P> {
        EventStream {
            events: self.events.clone(),
        }
    }

    /// Broadcast `payload` to every current listener.
    ///
    /// A listener that panics is logged and skipped; the others are still
    /// notified and this call never fails.
    pub fn execute(&self, payload: P) {
        self.events.emit(payload);
    }

    /// Like [`execute`](Self::execute), but reports listeners that panicked.
    pub fn try_execute(&self, payload: P) -> Result<(), DispatchError> {
        self.events.try_emit(payload)
    }

    /// Number of live listeners.
    pub fn subscriber_count(&self) -> usize {
        self.events.subscriber_count()
    }
}

impl<P: Send + 'static> Default for ActionWith<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Clone for ActionWith<P> {
    fn clone(&self) -> Self {
        Self {
            events: self.events.clone(),
        }
    }
}

impl<P> fmt::Debug for ActionWith<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ActionWith").field(&self.events).finish()
    }
}

/// A named command without a payload.
///
/// Listeners receive `&()`; see [`ActionWith`] for delivery rules.
#[derive(Clone, Default)]
pub struct Action {
    inner: ActionWith<()>,
}

impl Action {
    /// Create an action with a generic diagnostic name.
    pub fn new() -> Self {
        Self::named("action")
    }

    /// Create an action whose name tags its log events.
    pub fn named(name: &'static str) -> Self {
        Self {
            inner: ActionWith::named(name),
        }
    }

    /// Diagnostic name of this action.
    pub fn name(&self) -> &'static str {
        self.inner.name()
    }

    /// A live stream of future executions.
    pub fn listen(&self) -> EventStream<()> {
        self.inner.listen()
    }

    /// Notify every current listener; panicking listeners are logged and skipped.
    pub fn execute(&self) {
        self.inner.execute(());
    }

    /// Like [`execute`](Self::execute), but reports listeners that panicked.
    pub fn try_execute(&self) -> Result<(), DispatchError> {
        self.inner.try_execute(())
    }

    /// Number of live listeners.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscriber_count()
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Action").field(&self.inner.events).finish()
    }
}
