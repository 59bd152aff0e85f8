//! Connection configuration.

/// Keys and identity used to connect a messaging client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Key authorising publishes.
    pub publish_key: String,
    /// Key authorising subscribes.
    pub subscribe_key: String,
    /// Identifier this client presents to the backend and in presence
    /// events.
    pub user_id: String,
}

impl ClientConfig {
    /// Build a configuration from its three parts.
    pub fn new(
        publish_key: impl Into<String>,
        subscribe_key: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            publish_key: publish_key.into(),
            subscribe_key: subscribe_key.into(),
            user_id: user_id.into(),
        }
    }
}
