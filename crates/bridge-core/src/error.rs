//! Error taxonomy for the routing core.

use crate::ports::IndexError;
use bridge_bus::BusError;
use thiserror::Error;

/// Errors raised while processing one inbound message or callback.
///
/// Failures are contained at the handler boundary: every variant here ends
/// as a log line plus an [`crate::ErrorSink`] record, never as a reply to
/// the producer.
#[derive(Debug, Error, Clone)]
pub enum BridgeError {
    /// Unparseable JSON in a block payload or ownership declaration.
    /// The message is dropped; no retry, no dead-lettering.
    #[error("Malformed {context}: {reason}")]
    MalformedInput {
        /// What was being parsed (e.g. "block payload").
        context: &'static str,
        /// Parser diagnostic.
        reason: String,
    },

    /// Block type outside the recognized set.
    #[error("Unknown block type '{0}'")]
    UnknownBlockType(String),

    /// Account index operation failed (connectivity, not absence).
    #[error(transparent)]
    Index(#[from] IndexError),

    /// Bus operation failed.
    #[error(transparent)]
    Bus(#[from] BusError),
}

impl BridgeError {
    /// Build a malformed-input error from a parser diagnostic.
    pub fn malformed(context: &'static str, reason: impl ToString) -> Self {
        Self::MalformedInput {
            context,
            reason: reason.to_string(),
        }
    }
}
