//! State management with stores.
//!
//! A [`Store`] owns one state value, changes it only through shallow-merging
//! `set` calls, and exposes deduplicated [`Selection`]s of it. Concrete
//! stores embed a `Store` and implement [`ReactiveStore`].

mod reactive;
mod selection;
mod state;
mod store;

pub use reactive::ReactiveStore;
pub use selection::Selection;
pub use state::State;
pub use store::Store;
