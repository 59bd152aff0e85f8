//! Displayed log entries.

use std::fmt;

use uuid::Uuid;

/// Kind of event a log entry records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Category {
    /// Our publish was accepted.
    Sent,
    /// A message arrived on the channel.
    Received,
    /// A presence change, with its action.
    Presence {
        /// Presence action (`join`, `leave`, ...).
        action: String,
    },
    /// New channels were subscribed.
    SubscriptionChanged,
    /// Connection status report.
    Status,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sent => f.write_str("[PUBLISH: sent]"),
            Self::Received => f.write_str("[MESSAGE: received]"),
            Self::Presence { action } => write!(f, "[PRESENCE: {action}]"),
            Self::SubscriptionChanged => f.write_str("[SUBSCRIPTION CHANGED: new channels]"),
            Self::Status => f.write_str("[STATUS: connection]"),
        }
    }
}

/// Immutable log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    id: Uuid,
    category: Category,
    text: String,
}

impl Message {
    /// New entry with a fresh identifier.
    pub fn new(category: Category, text: impl Into<String>) -> Self {
        Self { id: Uuid::new_v4(), category, text: text.into() }
    }

    /// Unique identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Kind of event.
    pub fn category(&self) -> &Category {
        &self.category
    }

    /// Display text.
    pub fn text(&self) -> &str {
        &self.text
    }
}
