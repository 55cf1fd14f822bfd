use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::stream::{BehaviorSubject, Observable, Subscription};

type Projection<T, K> = Arc<dyn Fn(&T) -> K + Send + Sync>;

/// A derived, deduplicated view of a store's state.
///
/// Each subscriber is called with the projected value as soon as it
/// subscribes, and afterwards only when a `set` changes the projected value
/// (compared with `PartialEq`). Updates that leave the projection equal are
/// filtered out, even if other parts of the state changed.
///
/// Every subscription keeps its own memory of the last value it was given;
/// subscriptions never deduplicate against each other.
pub struct Selection<T, K> {
    source: BehaviorSubject<T>,
    project: Projection<T, K>,
}

impl<T, K> Selection<T, K>
where
    T: Send + Sync + 'static,
    K: Clone + PartialEq + Send + 'static,
{
    pub(crate) fn new<F>(source: BehaviorSubject<T>, project: F) -> Self
    where
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        Self {
            source,
            project: Arc::new(project),
        }
    }

    /// The projection of the current state, without subscribing.
    pub fn get(&self) -> K {
        (self.project)(&*self.source.value())
    }

    /// Subscribe to the projected value; replays it immediately.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&K) + Send + Sync + 'static,
    {
        let project = Arc::clone(&self.project);
        let last: Mutex<Option<K>> = Mutex::new(None);

        self.source.subscribe(move |state: &T| {
            let next = project(state);
            {
                let mut last = last.lock();
                if last.as_ref() == Some(&next) {
                    return;
                }
                *last = Some(next.clone());
            }
            callback(&next);
        })
    }

    /// Derive a further projection from this one.
    ///
    /// The new selection deduplicates on its own output type.
    pub fn map<U, F>(&self, f: F) -> Selection<T, U>
    where
        U: Clone + PartialEq + Send + 'static,
        F: Fn(&K) -> U + Send + Sync + 'static,
    {
        let project = Arc::clone(&self.project);
        Selection::new(self.source.clone(), move |state: &T| f(&project(state)))
    }
}

impl<T, K> Observable for Selection<T, K>
where
    T: Send + Sync + 'static,
    K: Clone + PartialEq + Send + 'static,
{
    type Item = K;

    fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&K) + Send + Sync + 'static,
    {
        Selection::subscribe(self, callback)
    }
}

impl<T, K> Clone for Selection<T, K> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            project: Arc::clone(&self.project),
        }
    }
}

impl<T: Send + Sync + 'static, K> fmt::Debug for Selection<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selection")
            .field("store", &self.source.name())
            .finish_non_exhaustive()
    }
}
