//! Event handlers for item event deliveries

mod item_events;

pub use item_events::ItemEventLogger;
