use std::fmt;
use std::sync::Arc;

use crate::error::{DispatchError, SubscriberFailure};
use crate::store::{Selection, State};
use crate::stream::{BehaviorSubject, Observable, Subscription};

/// A single source of truth for a piece of application state.
///
/// The store holds exactly one current value. It changes only through
/// [`set`](Store::set), which shallow-merges a partial update and then
/// notifies subscribers synchronously, before returning.
///
/// Cloning a `Store` yields another handle to the same state, which is how
/// action listeners get to call `set`.
///
/// # Usage contract
///
/// Projections passed to [`select`](Store::select) must be pure: no side
/// effects, no reads of other mutable state. Impure projections are not
/// detected and surface as missing or stale notifications.
///
/// # Examples
///
/// ```
/// use cachet::{state, Store};
/// use std::sync::{Arc, Mutex};
///
/// state! {
///     #[derive(Clone, Debug, PartialEq)]
///     pub struct Profile / ProfilePatch {
///         pub name: String,
///         pub visits: u32,
///     }
/// }
///
/// let store = Store::new(Profile { name: "ada".into(), visits: 0 });
/// let names = Arc::new(Mutex::new(Vec::new()));
///
/// let names_clone = names.clone();
/// let _sub = store
///     .select(|profile| profile.name.clone())
///     .subscribe(move |name| names_clone.lock().unwrap().push(name.clone()));
///
/// store.set(ProfilePatch::default().visits(1)); // name unchanged, filtered
/// store.set(ProfilePatch::default().name("grace".into()));
///
/// assert_eq!(*names.lock().unwrap(), vec!["ada", "grace"]);
/// assert_eq!(store.values().visits, 1);
/// ```
pub struct Store<T> {
    state: BehaviorSubject<T>,
}

impl<T: State> Store<T> {
    /// Create a new store with the given initial state.
    pub fn new(initial: T) -> Self {
        Self::named("store", initial)
    }

    /// Create a store whose name tags its log events.
    pub fn named(name: &'static str, initial: T) -> Self {
        tracing::debug!(store = name, "store created");
        Self {
            state: BehaviorSubject::named(name, initial),
        }
    }

    /// Diagnostic name used in log events and errors.
    pub fn name(&self) -> &'static str {
        self.state.name()
    }

    /// Get a clone of the current state.
    pub fn values(&self) -> T {
        T::clone(&self.state.value())
    }

    /// The current state as a shared, immutable snapshot.
    pub fn snapshot(&self) -> Arc<T> {
        self.state.value()
    }

    /// Read state without cloning it.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        self.state.read(f)
    }

    /// Shallow-merge `partial` into the state and notify subscribers.
    ///
    /// Fields absent from `partial` keep their value. Subscribers that panic
    /// are logged and skipped; this call never fails.
    pub fn set(&self, partial: T::Partial) {
        self.apply(partial);
    }

    /// Like [`set`](Self::set), but reports subscribers that panicked.
    pub fn try_set(&self, partial: T::Partial) -> Result<(), DispatchError> {
        DispatchError::check(self.name(), self.apply(partial))
    }

    /// Build a partial update from the current state, then `set` it.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T::Partial,
    {
        let partial = self.read(f);
        self.set(partial);
    }

    /// Derive a deduplicated, replaying view of the state.
    pub fn select<K, F>(&self, project: F) -> Selection<T, K>
    where
        K: Clone + PartialEq + Send + 'static,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        Selection::new(self.state.clone(), project)
    }

    /// Subscribe to the full state.
    ///
    /// The callback receives the current state immediately, then the new
    /// state after every `set`, whether or not anything changed.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.state.subscribe(callback)
    }

    /// Number of live subscriptions, selections included.
    pub fn subscriber_count(&self) -> usize {
        self.state.subscriber_count()
    }

    fn apply(&self, partial: T::Partial) -> Vec<SubscriberFailure> {
        self.state.replace_with(|current| {
            let mut next = current.clone();
            next.merge(partial);
            next
        })
    }
}

impl<T: State> Observable for Store<T> {
    type Item = T;

    fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        Store::subscribe(self, callback)
    }
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Store").field(&self.state).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    crate::state! {
        #[derive(Clone, Debug, PartialEq)]
        struct AppState / AppPatch {
            count: usize,
            name: String,
        }
    }

    crate::state! {
        #[derive(Clone, Debug, PartialEq)]
        struct Pair / PairPatch {
            a: i32,
            b: i32,
        }
    }

    fn recorder<K>() -> (Arc<Mutex<Vec<K>>>, impl Fn(&K) + Send + Sync + 'static)
    where
        K: Clone + Send + 'static,
    {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        (seen, move |value: &K| seen_clone.lock().push(value.clone()))
    }

    #[test]
    fn store_starts_with_initial_state() {
        let store = Store::new(AppState {
            count: 0,
            name: "test".to_string(),
        });

        assert_eq!(
            store.values(),
            AppState {
                count: 0,
                name: "test".to_string(),
            }
        );
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn store_set_is_a_shallow_merge() {
        let store = Store::new(Pair { a: 1, b: 2 });

        store.set(PairPatch::default().b(3));

        assert_eq!(store.values(), Pair { a: 1, b: 3 });
    }

    #[test]
    fn store_update() {
        let store = Store::new(AppState {
            count: 0,
            name: "test".to_string(),
        });

        store.update(|state| AppPatch::default().count(state.count + 10));

        assert_eq!(store.values().count, 10);
        assert_eq!(store.read(|state| state.name.clone()), "test");
    }

    #[test]
    fn selection_replays_latest_value() {
        let store = Store::new(Pair { a: 1, b: 1 });
        store.set(PairPatch::default().a(5));

        let (seen, record) = recorder::<i32>();
        let _sub = store.select(|state| state.a).subscribe(record);

        assert_eq!(*seen.lock(), vec![5]);
    }

    #[test]
    fn selection_skips_unchanged_projection() {
        let store = Store::new(Pair { a: 1, b: 1 });
        let (seen, record) = recorder::<i32>();
        let _sub = store.select(|state| state.a).subscribe(record);

        store.set(PairPatch::default().b(2));
        assert_eq!(*seen.lock(), vec![1]);

        store.set(PairPatch::default().a(2));
        assert_eq!(*seen.lock(), vec![1, 2]);
    }

    #[test]
    fn selections_are_independent() {
        let store = Store::new(Pair { a: 1, b: 1 });

        let (seen_a, record_a) = recorder::<i32>();
        let _a = store.select(|state| state.a).subscribe(record_a);
        assert_eq!(*seen_a.lock(), vec![1]);

        let (seen_b, record_b) = recorder::<i32>();
        let _b = store.select(|state| state.b).subscribe(record_b);
        assert_eq!(*seen_a.lock(), vec![1]);
        assert_eq!(*seen_b.lock(), vec![1]);

        store.set(PairPatch::default().b(7));
        assert_eq!(*seen_a.lock(), vec![1]);
        assert_eq!(*seen_b.lock(), vec![1, 7]);
    }

    #[test]
    fn each_subscription_to_a_selection_dedups_on_its_own() {
        let store = Store::new(Pair { a: 1, b: 1 });
        let selection = store.select(|state| state.a);

        let (seen_early, record_early) = recorder::<i32>();
        let _early = selection.subscribe(record_early);
        store.set(PairPatch::default().a(2));

        let (seen_late, record_late) = recorder::<i32>();
        let _late = selection.subscribe(record_late);
        store.set(PairPatch::default().b(5));
        store.set(PairPatch::default().a(3));

        assert_eq!(*seen_early.lock(), vec![1, 2, 3]);
        assert_eq!(*seen_late.lock(), vec![2, 3]);
    }

    #[test]
    fn store_subscribe_sees_every_set() {
        let store = Store::new(Pair { a: 0, b: 0 });
        let call_count = Arc::new(AtomicUsize::new(0));
        let call_count_clone = call_count.clone();

        let _sub = store.subscribe(move |_state| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(call_count.load(Ordering::SeqCst), 1);

        store.set(PairPatch::default());
        store.set(PairPatch::default().a(1));
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn unsubscribed_selection_stops_receiving() {
        let store = Store::new(Pair { a: 0, b: 0 });
        let (seen, record) = recorder::<i32>();

        let sub = store.select(|state| state.a).subscribe(record);
        store.set(PairPatch::default().a(1));
        sub.unsubscribe();
        store.set(PairPatch::default().a(2));

        assert_eq!(*seen.lock(), vec![0, 1]);
        assert_eq!(store.values().a, 2);
    }

    #[test]
    fn reentrant_set_is_delivered_after_current_round() {
        let store = Store::new(Pair { a: 0, b: 0 });
        let log = Arc::new(Mutex::new(Vec::new()));

        // Mirrors `a` into `b` from inside a notification.
        let writer = store.clone();
        let _mirror = store.select(|state| state.a).subscribe(move |a| {
            writer.set(PairPatch::default().b(*a * 10));
        });
        let log_clone = log.clone();
        let _observer = store.subscribe(move |state| {
            log_clone.lock().push((state.a, state.b));
        });

        store.set(PairPatch::default().a(1));

        assert_eq!(store.values(), Pair { a: 1, b: 10 });
        assert_eq!(*log.lock(), vec![(0, 0), (1, 0), (1, 10)]);
    }

    #[test]
    fn selection_made_mid_round_skips_updates_it_replayed() {
        let store = Store::new(Pair { a: 0, b: 0 });
        let (seen, record) = recorder::<i32>();
        let record = Arc::new(record);
        let late: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

        let writer = store.clone();
        let late_clone = late.clone();
        let _first = store.subscribe(move |state| {
            if state.a == 0 && state.b == 1 {
                writer.set(PairPatch::default().a(2));
                writer.set(PairPatch::default().a(3));
                let record = Arc::clone(&record);
                let sub = writer.select(|state| state.a).subscribe(move |a| record(a));
                *late_clone.lock() = Some(sub);
            }
        });

        store.set(PairPatch::default().b(1));
        assert_eq!(*seen.lock(), vec![3]);

        store.set(PairPatch::default().a(4));
        assert_eq!(*seen.lock(), vec![3, 4]);
    }

    #[test]
    fn dropping_subscriber_that_owns_another_store_subscription() {
        let store = Store::new(Pair { a: 0, b: 0 });
        let inner = store.select(|state| state.b).subscribe(|_| {});
        let outer = store.subscribe(move |_| {
            let _ = inner.is_active();
        });
        assert_eq!(store.subscriber_count(), 2);

        drop(outer);

        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn try_set_reports_panicking_subscriber_after_notifying_all() {
        let store = Store::named("faulty", Pair { a: 0, b: 0 });
        let _bad = store.select(|state| state.a).subscribe(|a| {
            if *a > 0 {
                panic!("cannot render {a}");
            }
        });
        let (seen, record) = recorder::<i32>();
        let _good = store.select(|state| state.a).subscribe(record);

        let err = store.try_set(PairPatch::default().a(1)).unwrap_err();

        assert_eq!(err.failures()[0].message, "cannot render 1");
        assert_eq!(*seen.lock(), vec![0, 1]);
        assert_eq!(store.values().a, 1);

        store.set(PairPatch::default().a(2));
        assert_eq!(*seen.lock(), vec![0, 1, 2]);
    }

    #[test]
    fn mapped_selection_deduplicates_on_output() {
        let store = Store::new(Pair { a: 1, b: 0 });
        let (seen, record) = recorder::<bool>();
        let _sub = store
            .select(|state| state.a)
            .map(|a| *a % 2 == 0)
            .subscribe(record);

        store.set(PairPatch::default().a(3));
        store.set(PairPatch::default().a(4));

        assert_eq!(*seen.lock(), vec![false, true]);
        assert!(store.select(|state| state.a).map(|a| *a > 3).get());
    }
}
