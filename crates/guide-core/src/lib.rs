//! Messaging client contract for the guide.
//!
//! The pub/sub SDK is an external collaborator. This crate pins down the
//! small surface the rest of the workspace relies on, so the store and the
//! UI never name a concrete SDK.
//!
//! # Components
//!
//! - [`client`]: The [`PubSubClient`] trait and listener registration
//! - [`event`]: The four event kinds delivered to listeners
//! - [`config`]: Keys and client identifier used to connect
//! - [`mod@env`]: Clock abstraction used to stamp timetokens
//! - [`memory`]: In-process loopback broker implementing the contract
//! - [`error`]: Client error types

pub mod client;
pub mod config;
pub mod env;
pub mod error;
pub mod event;
pub mod memory;

pub use client::{EventSender, ListenerId, PubSubClient};
pub use config::ClientConfig;
pub use env::{Environment, ManualEnv, SystemEnv};
pub use error::{KeyKind, PubSubError};
pub use event::{ConnectionStatus, MessageEvent, PresenceEvent, PubSubEvent, SubscriptionChange};
pub use memory::{MemoryBroker, MemoryClient, PublishedMessage};
