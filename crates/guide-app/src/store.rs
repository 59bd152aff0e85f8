//! Client store state machine.
//!
//! The `Store` turns messaging events into an append-only log of display
//! messages and turns user intent into publish requests. It performs no I/O:
//! every operation returns [`StoreAction`]s that the caller executes, and
//! outcomes come back in as [`StoreEvent`]s.
//!
//! Failures (publish errors, status errors, undecodable payloads) never stop
//! the store. They are logged and the most recent one is kept in
//! [`Store::last_error`] for the UI to show.

use guide_core::{ClientConfig, MessageEvent, PresenceEvent, PubSubEvent, SubscriptionChange};
use guide_proto::{EntryUpdate, payload::lossy_field};
use uuid::Uuid;

use crate::{
    config::{DecodeFailurePolicy, StoreConfig},
    event::{StoreAction, StoreEvent},
    message::{Category, Message},
};

/// Client store.
#[derive(Debug, Clone)]
pub struct Store {
    config: StoreConfig,
    user_id: String,
    messages: Vec<Message>,
    last_error: Option<String>,
}

impl Store {
    /// Create a store. Generates a client identifier if none is configured.
    pub fn new(config: StoreConfig) -> Self {
        let user_id = config.user_id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());
        Self { config, user_id, messages: Vec::new(), last_error: None }
    }

    /// Channel this store is bound to.
    pub fn channel(&self) -> &str {
        &self.config.channel
    }

    /// Client identifier.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Configuration for connecting the messaging client.
    pub fn client_config(&self) -> ClientConfig {
        self.config.client_config(&self.user_id)
    }

    /// Log in arrival order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Log, most recent first.
    pub fn newest_first(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().rev()
    }

    /// Most recent failure, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Actions that bring the store online.
    ///
    /// The caller must register its listener before executing these, so no
    /// event of the subscription is missed.
    pub fn start(&self) -> Vec<StoreAction> {
        tracing::info!(channel = %self.config.channel, user_id = %self.user_id, "subscribing");
        vec![StoreAction::Subscribe {
            channels: vec![self.config.channel.clone()],
            with_presence: self.config.with_presence,
        }]
    }

    /// Publish an update for the default entry.
    ///
    /// Empty text is not rejected here; frontends filter it.
    pub fn publish(&self, update: &str) -> Vec<StoreAction> {
        self.publish_entry(update, &self.config.default_entry)
    }

    /// Publish an update for an explicit entry.
    pub fn publish_entry(&self, update: &str, entry: &str) -> Vec<StoreAction> {
        tracing::debug!(channel = %self.config.channel, entry, "publishing update");
        vec![StoreAction::Publish {
            channel: self.config.channel.clone(),
            payload: EntryUpdate::with_entry(update, entry),
        }]
    }

    /// Append an entry to the log.
    pub fn display(&mut self, category: Category, text: impl Into<String>) {
        self.messages.push(Message::new(category, text));
    }

    /// Process an event and return resulting actions.
    pub fn handle(&mut self, event: StoreEvent) -> Vec<StoreAction> {
        match event {
            StoreEvent::PubSub(PubSubEvent::Message(message)) => {
                self.handle_message(&message);
                Vec::new()
            },
            StoreEvent::PubSub(PubSubEvent::Presence(presence)) => {
                self.handle_presence(&presence);
                Vec::new()
            },
            StoreEvent::PubSub(PubSubEvent::SubscriptionChange(change)) => {
                self.handle_subscription_change(change)
            },
            StoreEvent::PubSub(PubSubEvent::Status(Ok(status))) => {
                self.display(Category::Status, format!("state: {status}"));
                Vec::new()
            },
            StoreEvent::PubSub(PubSubEvent::Status(Err(error))) => {
                tracing::error!(%error, "status error");
                self.last_error = Some(format!("status: {error}"));
                Vec::new()
            },
            StoreEvent::Published(Ok(timetoken)) => {
                self.display(
                    Category::Sent,
                    format!("timetoken: {} ({timetoken})", timetoken.formatted()),
                );
                Vec::new()
            },
            StoreEvent::Published(Err(error)) => {
                tracing::warn!(%error, transient = error.is_transient(), "publish failed");
                self.last_error = Some(format!("publish: {error}"));
                Vec::new()
            },
        }
    }

    fn handle_message(&mut self, message: &MessageEvent) {
        match EntryUpdate::from_value(&message.payload) {
            Ok(update) => {
                self.display(
                    Category::Received,
                    format!("entry: {}, update: {}", update.entry, update.update),
                );
            },
            Err(error) => match self.config.decode_failure {
                DecodeFailurePolicy::SubstituteNull => {
                    tracing::debug!(%error, timetoken = %message.timetoken, "showing partial payload");
                    let text = format!(
                        "entry: {}, update: {}",
                        lossy_field(&message.payload, "entry"),
                        lossy_field(&message.payload, "update")
                    );
                    self.display(Category::Received, text);
                },
                DecodeFailurePolicy::Drop => {
                    tracing::warn!(%error, timetoken = %message.timetoken, "dropping message");
                    self.last_error = Some(format!("dropped message {}: {error}", message.timetoken));
                },
            },
        }
    }

    fn handle_presence(&mut self, presence: &PresenceEvent) {
        let text = format!("event uuid: {}, channel: {}", presence.user_id(), presence.channel);
        self.display(Category::Presence { action: presence.action() }, text);
    }

    fn handle_subscription_change(&mut self, change: SubscriptionChange) -> Vec<StoreAction> {
        match change {
            SubscriptionChange::Subscribed { channels } => {
                let Some(first) = channels.first() else {
                    tracing::debug!("subscribed to no channels");
                    return Vec::new();
                };
                self.display(Category::SubscriptionChanged, format!("channels added: {first}"));

                match &self.config.auto_publish {
                    Some(text) => self.publish(text),
                    None => Vec::new(),
                }
            },
            SubscriptionChange::Unsubscribed { channels } => {
                tracing::debug!(?channels, "unsubscribed");
                Vec::new()
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use guide_core::{ConnectionStatus, PubSubError};
    use guide_proto::Timetoken;
    use proptest::prelude::*;
    use serde_json::{Value, json};

    use super::*;

    fn store() -> Store {
        Store::new(StoreConfig::default().with_user_id("arthur"))
    }

    fn message_event(payload: Value) -> StoreEvent {
        StoreEvent::PubSub(PubSubEvent::Message(MessageEvent {
            channel: "the_guide".into(),
            publisher: Some("ford".into()),
            payload,
            timetoken: Timetoken::new(15_870_632_960_000_000),
        }))
    }

    fn subscribed(channels: &[&str]) -> StoreEvent {
        StoreEvent::PubSub(PubSubEvent::SubscriptionChange(SubscriptionChange::Subscribed {
            channels: channels.iter().map(ToString::to_string).collect(),
        }))
    }

    #[test]
    fn generates_user_id_when_unset() {
        let a = Store::new(StoreConfig::default());
        let b = Store::new(StoreConfig::default());
        assert!(Uuid::parse_str(a.user_id()).is_ok());
        assert_ne!(a.user_id(), b.user_id());
    }

    #[test]
    fn client_config_carries_keys_and_identity() {
        let config = Store::new(StoreConfig::new("pub-key", "sub-key").with_user_id("zaphod"))
            .client_config();
        assert_eq!(config, ClientConfig::new("pub-key", "sub-key", "zaphod"));
    }

    #[test]
    fn start_subscribes_with_presence() {
        assert_eq!(
            store().start(),
            vec![StoreAction::Subscribe { channels: vec!["the_guide".into()], with_presence: true }]
        );
    }

    #[test]
    fn publish_uses_default_entry() {
        assert_eq!(
            store().publish("Mostly Harmless."),
            vec![StoreAction::Publish {
                channel: "the_guide".into(),
                payload: EntryUpdate::with_entry("Mostly Harmless.", "Earth"),
            }]
        );
    }

    #[test]
    fn publish_success_appends_sent_entry() {
        let mut store = store();

        let actions =
            store.handle(StoreEvent::Published(Ok(Timetoken::new(15_870_632_960_000_000))));

        assert!(actions.is_empty());
        assert_eq!(store.messages().len(), 1);
        let message = &store.messages()[0];
        assert_eq!(message.category(), &Category::Sent);
        assert_eq!(message.text(), "timetoken: 4/16/20, 6:54:56 PM (15870632960000000)");
    }

    #[test]
    fn publish_failure_appends_nothing() {
        let mut store = store();

        store.handle(StoreEvent::Published(Err(PubSubError::PublishFailed {
            reason: "quota".into(),
        })));

        assert!(store.messages().is_empty());
        assert_eq!(store.last_error(), Some("publish: publish failed: quota"));
    }

    #[test]
    fn received_message_shows_both_fields() {
        let mut store = store();

        store.handle(message_event(json!({ "entry": "X", "update": "Y" })));

        let message = &store.messages()[0];
        assert_eq!(message.category(), &Category::Received);
        assert!(message.text().contains('X'));
        assert!(message.text().contains('Y'));
        assert_eq!(message.text(), "entry: X, update: Y");
    }

    #[test]
    fn undecodable_message_substitutes_null() {
        let mut store = store();

        store.handle(message_event(json!({ "update": "Y" })));
        store.handle(message_event(json!("just text")));

        let texts: Vec<_> = store.messages().iter().map(Message::text).collect();
        assert_eq!(texts, vec!["entry: null, update: Y", "entry: null, update: null"]);
        assert_eq!(store.last_error(), None);
    }

    #[test]
    fn undecodable_message_is_dropped_when_configured() {
        let mut store = Store::new(
            StoreConfig::default().with_decode_failure(DecodeFailurePolicy::Drop),
        );

        store.handle(message_event(json!({ "update": 3 })));

        assert!(store.messages().is_empty());
        assert!(store.last_error().is_some_and(|e| e.starts_with("dropped message")));
    }

    #[test]
    fn presence_shows_uuid_and_action() {
        let mut store = store();

        store.handle(StoreEvent::PubSub(PubSubEvent::Presence(PresenceEvent::new(
            "the_guide",
            "join",
            "ford",
        ))));

        let message = &store.messages()[0];
        assert_eq!(message.category().to_string(), "[PRESENCE: join]");
        assert_eq!(message.text(), "event uuid: ford, channel: the_guide");
    }

    #[test]
    fn presence_without_metadata_shows_null() {
        let mut store = store();

        store.handle(StoreEvent::PubSub(PubSubEvent::Presence(PresenceEvent {
            channel: "the_guide".into(),
            metadata: None,
        })));

        let message = &store.messages()[0];
        assert_eq!(message.category().to_string(), "[PRESENCE: null]");
        assert_eq!(message.text(), "event uuid: null, channel: the_guide");
    }

    #[test]
    fn subscribed_names_first_channel_without_auto_publish() {
        let mut store = store();

        let actions = store.handle(subscribed(&["the_guide", "the_other_guide"]));

        assert!(actions.is_empty());
        assert_eq!(store.messages()[0].text(), "channels added: the_guide");
    }

    #[test]
    fn subscribed_auto_publishes_when_configured() {
        let mut store =
            Store::new(StoreConfig::default().with_auto_publish(crate::AUTO_PUBLISH_TEXT));

        let actions = store.handle(subscribed(&["the_guide"]));

        assert_eq!(
            actions,
            vec![StoreAction::Publish {
                channel: "the_guide".into(),
                payload: EntryUpdate::with_entry("Harmless.", "Earth"),
            }]
        );
    }

    #[test]
    fn empty_subscription_is_ignored() {
        let mut store = Store::new(StoreConfig::default().with_auto_publish("Harmless."));

        let actions = store.handle(subscribed(&[]));

        assert!(actions.is_empty());
        assert!(store.messages().is_empty());
    }

    #[test]
    fn status_success_and_failure() {
        let mut store = store();

        store.handle(StoreEvent::PubSub(PubSubEvent::Status(Ok(ConnectionStatus::Connected))));
        store.handle(StoreEvent::PubSub(PubSubEvent::Status(Err(PubSubError::Disconnected {
            reason: "network down".into(),
        }))));

        assert_eq!(store.messages().len(), 1);
        assert_eq!(store.messages()[0].text(), "state: connected");
        assert_eq!(store.last_error(), Some("status: disconnected: network down"));
    }

    #[test]
    fn newest_first_reverses_arrival_order() {
        let mut store = store();
        store.display(Category::Status, "first");
        store.display(Category::Status, "second");
        store.display(Category::Status, "third");

        let rendered: Vec<_> = store.newest_first().map(Message::text).collect();
        let stored: Vec<_> = store.messages().iter().map(Message::text).collect();

        assert_eq!(rendered, vec!["third", "second", "first"]);
        assert_eq!(stored, vec!["first", "second", "third"]);
    }

    proptest! {
        #[test]
        fn publish_issues_exactly_one_request(update in ".+") {
            let actions = store().publish(&update);

            prop_assert_eq!(actions.len(), 1);
            match &actions[0] {
                StoreAction::Publish { payload, .. } => {
                    prop_assert_eq!(&payload.update, &update);
                    prop_assert_eq!(payload.entry.as_str(), "Earth");
                },
                other => prop_assert!(false, "unexpected action {:?}", other),
            }
        }

        #[test]
        fn log_grows_by_one_per_displayed_event(count in 0usize..64) {
            let mut store = store();
            for i in 0..count {
                store.handle(message_event(json!({ "entry": "Earth", "update": i.to_string() })));
            }
            prop_assert_eq!(store.messages().len(), count);
        }
    }
}
