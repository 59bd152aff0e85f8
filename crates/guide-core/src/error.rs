//! Messaging client error types.

use thiserror::Error;

/// Which key a configuration error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// The publish key.
    Publish,
    /// The subscribe key.
    Subscribe,
}

impl std::fmt::Display for KeyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Publish => f.write_str("publish"),
            Self::Subscribe => f.write_str("subscribe"),
        }
    }
}

/// Errors reported by a messaging client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PubSubError {
    /// A key is missing or rejected by the backend.
    #[error("invalid {kind} key")]
    InvalidKey {
        /// Which key was rejected.
        kind: KeyKind,
    },

    /// The backend refused or failed to accept a publish.
    #[error("publish failed: {reason}")]
    PublishFailed {
        /// Description of the failure.
        reason: String,
    },

    /// Payload could not be encoded for sending.
    #[error("payload rejected: {reason}")]
    Payload {
        /// Description of the encoding failure.
        reason: String,
    },

    /// The client lost its connection.
    #[error("disconnected: {reason}")]
    Disconnected {
        /// Description of the disconnect.
        reason: String,
    },
}

impl PubSubError {
    /// Returns true if retrying the same request could succeed.
    ///
    /// Key and payload errors need a configuration or input change first.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::PublishFailed { .. } | Self::Disconnected { .. } => true,
            Self::InvalidKey { .. } | Self::Payload { .. } => false,
        }
    }
}
