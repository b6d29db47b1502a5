// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! Dispatch itself never fails except for misuse (re-dispatching an event
//! that is still in flight) or a handler failure, which is passed through
//! untouched. Removing an absent listener and cancelling a non-cancelable
//! event are not errors.

/// Errors returned by [`Dispatcher::dispatch`](crate::dispatcher::Dispatcher::dispatch).
///
/// `E` is the scripting host's handler error type.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum DispatchError<E> {
    /// The event instance is already being dispatched.
    #[error("event `{event_type}` is already being dispatched")]
    AlreadyDispatching {
        /// Type of the offending event.
        event_type: String,
    },
    /// A handler failed; remaining listeners and phases were skipped.
    #[error(transparent)]
    Handler(E),
}

impl<E> DispatchError<E> {
    /// The handler error, if this is one.
    pub fn into_handler_error(self) -> Option<E> {
        match self {
            Self::Handler(e) => Some(e),
            Self::AlreadyDispatching { .. } => None,
        }
    }
}

/// Errors from event value conversions.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum EventError {
    /// A numeric phase outside `0..=3`.
    #[error("invalid event phase code {0}")]
    InvalidPhase(u16),
}
