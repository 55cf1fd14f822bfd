use std::sync::Arc;

use crate::error::DispatchError;
use crate::store::{Selection, State, Store};
use crate::stream::Subscription;

/// The store surface shared by every concrete store.
///
/// A concrete store embeds a [`Store`], wires its actions to `set` in its
/// constructor, and implements only [`store`](ReactiveStore::store); the rest
/// of the surface comes from the default methods.
///
/// Implementors must not hand out ways to write the state other than `set`:
/// readers get snapshots, never mutable access.
///
/// # Examples
///
/// ```
/// use cachet::{state, Action, ReactiveStore, Store};
///
/// state! {
///     #[derive(Clone, Debug, PartialEq)]
///     pub struct Clicks / ClicksPatch {
///         pub total: u32,
///     }
/// }
///
/// struct ClickStore {
///     store: Store<Clicks>,
///     click: Action,
/// }
///
/// impl ClickStore {
///     fn new() -> Self {
///         let store = Store::named("clicks", Clicks { total: 0 });
///         let click = Action::named("click");
///
///         let handle = store.clone();
///         click
///             .listen()
///             .subscribe(move |_| handle.update(|s| ClicksPatch::default().total(s.total + 1)))
///             .detach();
///
///         Self { store, click }
///     }
/// }
///
/// impl ReactiveStore for ClickStore {
///     type State = Clicks;
///
///     fn store(&self) -> &Store<Clicks> {
///         &self.store
///     }
/// }
///
/// let clicks = ClickStore::new();
/// clicks.click.execute();
/// clicks.click.execute();
/// assert_eq!(clicks.values().total, 2);
/// ```
pub trait ReactiveStore {
    type State: State;

    /// The embedded store backing this type.
    fn store(&self) -> &Store<Self::State>;

    fn values(&self) -> Self::State {
        self.store().values()
    }

    fn snapshot(&self) -> Arc<Self::State> {
        self.store().snapshot()
    }

    fn set(&self, partial: <Self::State as State>::Partial) {
        self.store().set(partial)
    }

    fn try_set(&self, partial: <Self::State as State>::Partial) -> Result<(), DispatchError> {
        self.store().try_set(partial)
    }

    fn select<K, F>(&self, project: F) -> Selection<Self::State, K>
    where
        K: Clone + PartialEq + Send + 'static,
        F: Fn(&Self::State) -> K + Send + Sync + 'static,
    {
        self.store().select(project)
    }

    fn subscribe_state<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Self::State) + Send + Sync + 'static,
    {
        self.store().subscribe(callback)
    }
}

impl<T: State> ReactiveStore for Store<T> {
    type State = T;

    fn store(&self) -> &Store<T> {
        self
    }
}
