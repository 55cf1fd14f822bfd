//! Error types reported by the `try_*` dispatch entry points.

use std::fmt;

use thiserror::Error;

use crate::runtime::SubscriberId;

/// A single subscriber that panicked while a value was being delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberFailure {
    /// The subscription whose callback panicked.
    pub subscriber: SubscriberId,
    /// The panic payload, if it was a string.
    pub message: String,
}

impl fmt::Display for SubscriberFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subscriber {} panicked: {}", self.subscriber, self.message)
    }
}

/// Errors that can occur while broadcasting a value to subscribers.
///
/// Dispatch itself always completes: every subscriber is notified even when
/// some of them panic. This error only reports what went wrong afterwards.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// One or more subscriber callbacks panicked during the dispatch loop.
    #[error("{} subscriber(s) of '{channel}' panicked during dispatch", .failures.len())]
    SubscriberPanicked {
        channel: &'static str,
        failures: Vec<SubscriberFailure>,
    },
}

impl DispatchError {
    /// The individual failures, in delivery order.
    pub fn failures(&self) -> &[SubscriberFailure] {
        match self {
            DispatchError::SubscriberPanicked { failures, .. } => failures,
        }
    }

    pub(crate) fn check(
        channel: &'static str,
        failures: Vec<SubscriberFailure>,
    ) -> Result<(), DispatchError> {
        if failures.is_empty() {
            Ok(())
        } else {
            Err(DispatchError::SubscriberPanicked { channel, failures })
        }
    }
}
