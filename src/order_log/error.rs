//! Error types for the Order Log.

use thiserror::Error;

/// Errors surfaced by [`OrderLogClient`](super::OrderLogClient).
///
/// Recording a well-formed order cannot fail while the log actor is running; both
/// variants mean the actor has gone away.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrderLogError {
    #[error("Order log closed")]
    Closed,
    #[error("Order log dropped response channel")]
    Dropped,
}
