//! Runtime support for broadcast primitives.
//!
//! This module provides subscriber bookkeeping, ordered delivery, and the
//! panic isolation shared by every channel in the crate.

mod dispatch;

pub use dispatch::SubscriberId;
pub(crate) use dispatch::Dispatcher;
