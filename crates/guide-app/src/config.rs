//! Store configuration.

use guide_core::ClientConfig;
use guide_proto::DEFAULT_ENTRY;

/// Channel the guide is published on.
pub const DEFAULT_CHANNEL: &str = "the_guide";

/// Update published automatically after subscribing, when enabled.
pub const AUTO_PUBLISH_TEXT: &str = "Harmless.";

/// What to show when a received payload is not an entry update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeFailurePolicy {
    /// Show the message anyway, with `null` for missing fields.
    #[default]
    SubstituteNull,
    /// Skip the message; only a warning is logged.
    Drop,
}

/// Configuration of a [`crate::Store`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Key authorising publishes.
    pub publish_key: String,
    /// Key authorising subscribes.
    pub subscribe_key: String,
    /// Client identifier. A random UUID is generated when `None`.
    pub user_id: Option<String>,
    /// Channel to subscribe and publish to. Fixed for the store's lifetime.
    pub channel: String,
    /// Receive presence events for the channel.
    pub with_presence: bool,
    /// Update to publish once the subscription is confirmed.
    pub auto_publish: Option<String>,
    /// Entry used for updates that do not name one.
    pub default_entry: String,
    /// Handling of undecodable payloads.
    pub decode_failure: DecodeFailurePolicy,
}

impl StoreConfig {
    /// Configuration with the given keys and defaults elsewhere.
    pub fn new(publish_key: impl Into<String>, subscribe_key: impl Into<String>) -> Self {
        Self {
            publish_key: publish_key.into(),
            subscribe_key: subscribe_key.into(),
            user_id: None,
            channel: DEFAULT_CHANNEL.to_string(),
            with_presence: true,
            auto_publish: None,
            default_entry: DEFAULT_ENTRY.to_string(),
            decode_failure: DecodeFailurePolicy::default(),
        }
    }

    /// Set the client identifier.
    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Enable publishing `text` once subscribed.
    #[must_use]
    pub fn with_auto_publish(mut self, text: impl Into<String>) -> Self {
        self.auto_publish = Some(text.into());
        self
    }

    /// Set the decode failure policy.
    #[must_use]
    pub fn with_decode_failure(mut self, policy: DecodeFailurePolicy) -> Self {
        self.decode_failure = policy;
        self
    }

    pub(crate) fn client_config(&self, user_id: &str) -> ClientConfig {
        ClientConfig::new(self.publish_key.clone(), self.subscribe_key.clone(), user_id)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new("demo", "demo")
    }
}
