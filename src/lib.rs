//! # Cachet
//!
//! A minimal reactive state container for Rust.
//!
//! Cachet keeps application state in one place and tells interested code
//! when the part it cares about changes. It has two building blocks:
//!
//! ## Stores (continuous state)
//!
//! - `Store<T>` - Holds exactly one current value of a [`State`] type
//! - `set` - Shallow-merges a partial update and notifies synchronously
//! - `select` - Derives a [`Selection`] that replays on subscribe and only
//!   emits when the projected value actually changes
//!
//! ## Actions (discrete commands)
//!
//! - `Action` / `ActionWith<P>` - Named, non-replaying broadcast channels
//! - Listeners are called in subscription order; executions with no
//!   listeners are dropped
//!
//! A concrete store embeds a `Store`, implements [`ReactiveStore`], and
//! wires its actions to `set` in its constructor.
//!
//! ## Delivery rules
//!
//! Everything is synchronous. A `set` or `execute` issued from inside a
//! subscriber takes effect at once, but its notification waits until the
//! current round has reached every subscriber. A subscriber that panics is
//! logged through `tracing` and skipped; the `try_*` variants report such
//! failures as a [`DispatchError`].

mod action;
mod error;
pub mod runtime;
mod store;
pub mod stream;

// Re-export main types for convenience
pub use action::{Action, ActionWith, EventStream};
pub use error::{DispatchError, SubscriberFailure};
pub use runtime::SubscriberId;
pub use store::{ReactiveStore, Selection, State, Store};
pub use stream::{Observable, Subscription};
