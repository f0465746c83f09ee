use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_items::{EventDispatcher, InMemoryItemRepository, ItemService};
use messaging::{JetStreamPublisher, init_metrics};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    init_tracing(&config.environment);
    init_metrics();

    info!("Connecting to NATS at {}", config.nats.url);

    // Event publishing is optional; the API serves without a broker
    let publisher = match JetStreamPublisher::connect(&config.nats).await {
        Ok(publisher) => Some(Arc::new(publisher)),
        Err(e) => {
            warn!(
                error = %e,
                url = %config.nats.url,
                "Event broker unavailable, item events will not be published"
            );
            None
        }
    };

    let events = match &publisher {
        Some(publisher) => EventDispatcher::new(publisher.clone()),
        None => EventDispatcher::disabled(),
    };

    let state = AppState {
        config,
        items: ItemService::new(InMemoryItemRepository::new(), events),
    };

    let api_routes = api::routes(&state);

    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes);
    let app = router.merge(health_router(state.config.app));

    info!(
        "Starting {} v{} with graceful shutdown (30s timeout)",
        state.config.app.name, state.config.app.version
    );

    create_production_app(
        app,
        &state.config.server,
        Duration::from_secs(30),
        async move {
            if let Some(publisher) = publisher {
                info!("Shutting down: closing event publisher");
                if let Err(e) = publisher.close().await {
                    warn!(error = %e, "Failed to close event publisher");
                }
            }
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Items API shutdown complete");
    Ok(())
}
