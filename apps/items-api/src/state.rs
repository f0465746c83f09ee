//! Application state management.

use domain_items::{InMemoryItemRepository, ItemService};

/// Shared application state.
///
/// Cloned per handler; every field is an `Arc` or cheap to copy. Broker
/// status is read through `items.events()`.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    pub items: ItemService<InMemoryItemRepository>,
}
