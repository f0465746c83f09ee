//! Items API routes

use axum::Router;
use domain_items::handlers;

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    handlers::router(state.items.clone())
}
