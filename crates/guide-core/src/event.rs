//! Events delivered by a messaging client to its listeners.
//!
//! A listener receives every event kind through one channel and dispatches
//! on the variant. Events arrive on the client's own context; the receiver
//! decides where to handle them.

use std::fmt;

use guide_proto::{NULL_TEXT, Timetoken};
use serde_json::{Map, Value};

use crate::error::PubSubError;

/// Presence metadata key carrying the action (`join`, `leave`, ...).
pub const PRESENCE_ACTION_KEY: &str = "pn_action";

/// Presence metadata key carrying the acting client identifier.
pub const PRESENCE_UUID_KEY: &str = "pn_uuid";

/// Event delivered to a listener.
#[derive(Debug, Clone, PartialEq)]
pub enum PubSubEvent {
    /// A message was published on a subscribed channel.
    Message(MessageEvent),

    /// A client's presence changed on a subscribed channel.
    Presence(PresenceEvent),

    /// The set of subscribed channels changed.
    SubscriptionChange(SubscriptionChange),

    /// Connection status report.
    Status(Result<ConnectionStatus, PubSubError>),
}

/// Message published on a channel.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageEvent {
    /// Channel the message was published on.
    pub channel: String,
    /// Identifier of the publishing client, when known.
    pub publisher: Option<String>,
    /// Undecoded payload.
    pub payload: Value,
    /// Timetoken assigned at publish.
    pub timetoken: Timetoken,
}

/// Presence change on a channel.
///
/// Metadata is sparse: backends may omit any key, or the whole map.
#[derive(Debug, Clone, PartialEq)]
pub struct PresenceEvent {
    /// Channel the presence change happened on.
    pub channel: String,
    /// Event metadata.
    pub metadata: Option<Map<String, Value>>,
}

impl PresenceEvent {
    /// Presence event with the action and acting client filled in.
    pub fn new(channel: impl Into<String>, action: &str, user_id: &str) -> Self {
        let mut metadata = Map::new();
        metadata.insert(PRESENCE_ACTION_KEY.to_string(), Value::from(action));
        metadata.insert(PRESENCE_UUID_KEY.to_string(), Value::from(user_id));
        Self { channel: channel.into(), metadata: Some(metadata) }
    }

    /// Metadata value as display text, [`NULL_TEXT`] when absent.
    pub fn metadata_text(&self, key: &str) -> String {
        match self.metadata.as_ref().and_then(|m| m.get(key)) {
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
            None => NULL_TEXT.to_string(),
        }
    }

    /// Presence action (`join`, `leave`, ...).
    pub fn action(&self) -> String {
        self.metadata_text(PRESENCE_ACTION_KEY)
    }

    /// Identifier of the client the event is about.
    pub fn user_id(&self) -> String {
        self.metadata_text(PRESENCE_UUID_KEY)
    }
}

/// Change to the set of subscribed channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionChange {
    /// Channels were added.
    Subscribed {
        /// Newly added channels, in request order.
        channels: Vec<String>,
    },

    /// Channels were removed.
    Unsubscribed {
        /// Removed channels.
        channels: Vec<String>,
    },
}

/// Connection state reported through status events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// Connection attempt in progress.
    Connecting,
    /// Connected and receiving.
    Connected,
    /// Connection lost, retrying.
    Reconnecting,
    /// Intentionally disconnected.
    Disconnected,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Reconnecting => "reconnecting",
            Self::Disconnected => "disconnected",
        };
        f.write_str(name)
    }
}
