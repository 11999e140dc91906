//! Error taxonomy for the ingress API.
//!
//! Validation errors fail before a sequence number is consumed and produce no
//! events. Once an admission is sequenced it is committed; later failures are
//! bugs and the engine fails loudly instead of returning them.

use crate::types::OrderId;

/// Rejection of an order submission. None of these consume a sequence number.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("quantity must be positive")]
    InvalidQuantity,
    #[error("limit order price must be positive")]
    InvalidPrice,
    #[error("symbol {0} is not owned by this engine")]
    UnknownSymbol(String),
    #[error("order {0} is already live in the book")]
    DuplicateOrder(OrderId),
    #[error("event enqueue timed out under backpressure")]
    BackpressureTimeout,
}

/// Rejection of a cancel request.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CancelError {
    /// The target is not resting: unknown id, already filled, or already
    /// cancelled. Cancel is idempotent with respect to the book.
    #[error("order {0} not found or already terminal")]
    NotFound(OrderId),
    #[error("event enqueue timed out under backpressure")]
    BackpressureTimeout,
}

/// Failure to hand an event to the emitter's buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EmitError {
    /// The bounded wait elapsed with the buffer still full.
    #[error("event buffer full: enqueue timed out")]
    Timeout,
    /// The receiving side is gone.
    #[error("event channel closed")]
    Closed,
}
