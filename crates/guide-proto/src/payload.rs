//! Entry update payload.
//!
//! The only message shape exchanged on the channel: a free-text `update`
//! about a named `entry` of the guide. Neither field is validated; both are
//! plain text of any length.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{ProtocolError, Result};

/// Entry used when the publisher does not name one.
pub const DEFAULT_ENTRY: &str = "Earth";

/// Text shown in place of a payload field that is missing.
pub const NULL_TEXT: &str = "null";

/// Payload published to and received from the channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryUpdate {
    /// Free-text update.
    pub update: String,
    /// Guide entry the update is about.
    pub entry: String,
}

impl EntryUpdate {
    /// Update for the [`DEFAULT_ENTRY`].
    pub fn new(update: impl Into<String>) -> Self {
        Self::with_entry(update, DEFAULT_ENTRY)
    }

    /// Update for an explicit entry.
    pub fn with_entry(update: impl Into<String>, entry: impl Into<String>) -> Self {
        Self { update: update.into(), entry: entry.into() }
    }

    /// Encode into the JSON value handed to the messaging client.
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(ProtocolError::Encode)
    }

    /// Decode a received payload.
    ///
    /// Both fields must be present and be strings. Unknown keys are ignored so
    /// newer publishers can add fields without breaking older readers.
    pub fn from_value(value: &Value) -> Result<Self> {
        Self::deserialize(value).map_err(ProtocolError::Decode)
    }
}

/// Read one key of a payload as display text.
///
/// Strings are returned verbatim, other JSON values in their compact JSON
/// form, and a missing key (or a payload that is not an object) yields
/// [`NULL_TEXT`].
pub fn lossy_field(payload: &Value, key: &str) -> String {
    match payload.get(key) {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => NULL_TEXT.to_string(),
    }
}
