//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use guide_app::{AUTO_PUBLISH_TEXT, DEFAULT_CHANNEL, DecodeFailurePolicy, StoreConfig};

/// Publish updates to the guide and watch the channel
#[derive(Parser, Debug)]
#[command(name = "guide-tui")]
#[command(about = "Publish updates to the guide and watch the channel")]
#[command(version)]
pub struct Args {
    /// Publish key
    #[arg(long, default_value = "demo")]
    pub publish_key: String,

    /// Subscribe key
    #[arg(long, default_value = "demo")]
    pub subscribe_key: String,

    /// Client identifier (random UUID if omitted)
    #[arg(long)]
    pub user_id: Option<String>,

    /// Channel to subscribe and publish to
    #[arg(long, default_value = DEFAULT_CHANNEL)]
    pub channel: String,

    /// Update published once subscribed
    #[arg(long, default_value = AUTO_PUBLISH_TEXT)]
    pub auto_publish: String,

    /// Do not publish anything on subscribe
    #[arg(long)]
    pub no_auto_publish: bool,

    /// Do not receive presence events
    #[arg(long)]
    pub no_presence: bool,

    /// Handling of received payloads that are not entry updates
    #[arg(long, value_enum, default_value_t = DecodeFailure::Null)]
    pub decode_failure: DecodeFailure,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// File to write logs to; the terminal is taken by the UI
    #[arg(long, default_value = "guide-tui.log")]
    pub log_file: PathBuf,
}

/// `--decode-failure` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DecodeFailure {
    /// Show the message with `null` fields.
    Null,
    /// Skip the message.
    Drop,
}

impl From<DecodeFailure> for DecodeFailurePolicy {
    fn from(value: DecodeFailure) -> Self {
        match value {
            DecodeFailure::Null => Self::SubstituteNull,
            DecodeFailure::Drop => Self::Drop,
        }
    }
}

impl Args {
    /// Store configuration described by the arguments.
    pub fn store_config(&self) -> StoreConfig {
        let mut config = StoreConfig::new(self.publish_key.clone(), self.subscribe_key.clone())
            .with_decode_failure(self.decode_failure.into());
        config.channel = self.channel.clone();
        config.with_presence = !self.no_presence;
        if let Some(user_id) = &self.user_id {
            config = config.with_user_id(user_id.clone());
        }
        if !self.no_auto_publish {
            config = config.with_auto_publish(self.auto_publish.clone());
        }
        config
    }
}
