//! Error types for the interop primitives.

use alloy_primitives::{Address, B256};
use thiserror::Error;

/// A required log is missing from a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LocateError {
    /// No log emitted by `address` carries the `topic` selector.
    #[error("no log with topic {topic} emitted by {address}")]
    NotFound {
        /// The contract expected to emit the log.
        address: Address,
        /// The expected event selector.
        topic: B256,
    },
}

/// Failures while decoding an event or rebuilding its payload.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// The log does not decode as the expected event.
    #[error("failed to decode {event} log: {source}")]
    Decode {
        /// The event that was expected.
        event: &'static str,
        /// The underlying codec error.
        #[source]
        source: alloy_sol_types::Error,
    },
}

impl PayloadError {
    /// Wraps a codec error raised while decoding `event`.
    pub const fn decode(event: &'static str, source: alloy_sol_types::Error) -> Self {
        Self::Decode { event, source }
    }
}
