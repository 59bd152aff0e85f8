//! Error types for payload handling.

use thiserror::Error;

/// Result alias for payload operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors produced while encoding or decoding channel payloads.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Payload could not be serialized to JSON.
    #[error("failed to encode payload: {0}")]
    Encode(#[source] serde_json::Error),

    /// Payload is not a valid entry update.
    #[error("payload is not an entry update: {0}")]
    Decode(#[source] serde_json::Error),

    /// Timetoken text is not a decimal integer.
    #[error("invalid timetoken: {input:?}")]
    InvalidTimetoken {
        /// The rejected input.
        input: String,
    },
}
