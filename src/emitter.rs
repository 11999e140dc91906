//! Bounded event buffer between the matcher and the external bus.
//!
//! Events enter in emission order and leave in the same order (per-symbol
//! FIFO). When the buffer is full the emitter blocks the writer
//! (backpressure) unless a bounded wait was configured, in which case the
//! enqueue fails with [`EmitError::Timeout`] after the wait elapses.

use crate::error::EmitError;
use crate::events::EngineEvent;
use crossbeam_channel::{bounded, Receiver, SendTimeoutError, Sender};
use std::time::Duration;

/// Consumer half handed to the bus-facing collaborator.
pub type EventReceiver = Receiver<EngineEvent>;

/// Producer half owned by the engine.
#[derive(Clone, Debug)]
pub struct EventEmitter {
    tx: Sender<EngineEvent>,
    timeout: Option<Duration>,
}

impl EventEmitter {
    /// Creates an emitter with a buffer of `capacity` events and returns the
    /// consumer half alongside it.
    pub fn bounded(capacity: usize) -> (Self, EventReceiver) {
        let (tx, rx) = bounded(capacity);
        (Self { tx, timeout: None }, rx)
    }

    /// Caps how long an enqueue may block on a full buffer. Without this the
    /// emitter blocks indefinitely and can never lose an event.
    pub fn enqueue_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Enqueues one event, blocking while the buffer is full.
    pub fn emit(&self, event: EngineEvent) -> Result<(), EmitError> {
        match self.timeout {
            None => self.tx.send(event).map_err(|_| EmitError::Closed),
            Some(timeout) => self.tx.send_timeout(event, timeout).map_err(|e| match e {
                SendTimeoutError::Timeout(_) => EmitError::Timeout,
                SendTimeoutError::Disconnected(_) => EmitError::Closed,
            }),
        }
    }
}
