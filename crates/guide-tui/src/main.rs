//! Guide terminal client.
//!
//! # Usage
//!
//! ```bash
//! # Publish "Harmless." on connect, log to guide-tui.log
//! guide-tui
//!
//! # Fixed identity, no automatic publish, verbose logs
//! guide-tui --user-id arthur --no-auto-publish --log-level debug
//! ```

use std::{
    fs::OpenOptions,
    sync::{Arc, Mutex},
};

use clap::Parser;
use guide_app::{Runtime, Store};
use guide_core::MemoryBroker;
use guide_tui::{Args, TerminalDriver};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_file = OpenOptions::new().create(true).append(true).open(&args.log_file)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Mutex::new(log_file)).with_ansi(false))
        .with(filter)
        .init();

    let store = Store::new(args.store_config());
    tracing::info!(user_id = store.user_id(), channel = store.channel(), "guide client starting");

    let broker = MemoryBroker::new();
    let client = Arc::new(broker.connect(store.client_config()));
    let driver = TerminalDriver::new()?;

    let store = Runtime::new(store, client, driver).run().await?;

    tracing::info!(messages = store.messages().len(), "guide client stopped");
    Ok(())
}
