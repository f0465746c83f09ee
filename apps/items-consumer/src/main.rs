//! Items Consumer
//!
//! Subscribes to the durable item events queue and logs every change.

mod config;
mod handlers;

use crate::config::Config;
use crate::handlers::ItemEventLogger;
use axum_helpers::shutdown_signal;
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_items::ItemEvent;
use eyre::Result;
use messaging::JetStreamConsumer;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(
        "Starting {} v{}, connecting to NATS at {}",
        config.app.name, config.app.version, config.nats.url
    );

    let mut consumer = JetStreamConsumer::connect(&config.nats).await?;
    let mut worker = consumer.consume::<ItemEvent, _>(ItemEventLogger).await?;

    info!(queue = %consumer.queue(), "Waiting for item events. Press Ctrl+C to exit");

    tokio::select! {
        _ = shutdown_signal() => {}
        result = &mut worker => {
            if let Err(e) = result {
                warn!(error = %e, "Consumer task failed");
            } else {
                warn!("Subscription ended unexpectedly");
            }
        }
    }

    worker.abort();
    consumer.close().await?;

    info!("Items consumer shutdown complete");
    Ok(())
}
