//! Readiness and metrics endpoints

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
struct ReadyResponse {
    status: &'static str,
    broker: &'static str,
    items: usize,
}

/// Create the readiness and metrics router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Readiness check
///
/// Item publishing is best-effort, so a missing broker degrades the service
/// without making it unready.
async fn readiness_check(State(state): State<AppState>) -> Json<ReadyResponse> {
    let events = state.items.events();
    let broker = if !events.is_enabled() {
        "disabled"
    } else if events.broker_connected().await {
        "connected"
    } else {
        "disconnected"
    };

    Json(ReadyResponse {
        status: if broker == "connected" {
            "ready"
        } else {
            "degraded"
        },
        broker,
        items: state.items.item_count().await,
    })
}

async fn metrics() -> String {
    messaging::render_metrics()
}
