//! Minimal observable streams.
//!
//! Two broadcast flavours back the rest of the crate:
//! - [`Subject`] - non-replaying; late subscribers only see later values
//! - [`BehaviorSubject`] - replaying; holds a current value and hands it to
//!   every new subscriber
//!
//! Every subscription returns a [`Subscription`] guard.

mod behavior;
mod subject;
mod subscription;

pub use behavior::BehaviorSubject;
pub use subject::Subject;
pub use subscription::Subscription;

/// Anything that can be subscribed to.
///
/// Implemented by action event streams, store selections, and the store
/// itself, so consumers can be written against any of them.
pub trait Observable {
    /// The type handed to subscribers.
    type Item;

    /// Register `callback`; dropping the returned guard unsubscribes.
    fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Self::Item) + Send + Sync + 'static;
}

impl<T: Send + 'static> Observable for Subject<T> {
    type Item = T;

    fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        Subject::subscribe(self, callback)
    }
}

impl<T: Send + Sync + 'static> Observable for BehaviorSubject<T> {
    type Item = T;

    fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        BehaviorSubject::subscribe(self, callback)
    }
}
