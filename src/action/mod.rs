//! Actions: named, non-replaying event channels.
//!
//! Actions carry discrete commands, as opposed to the continuous state held
//! by a [`Store`](crate::Store). A store typically listens to its actions and
//! turns each execution into a `set`.

mod action;

pub use action::{Action, ActionWith, EventStream};
