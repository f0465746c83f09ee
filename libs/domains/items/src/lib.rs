//! Items Domain
//!
//! An in-memory item registry whose mutations emit change events.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐     ┌─────────────────┐
//! │   Service   │────▶│ EventDispatcher │  ← ordered publish worker
//! └──────┬──────┘     └─────────────────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + in-memory implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_items::{handlers, EventDispatcher, InMemoryItemRepository, ItemService};
//! use messaging::JetStreamPublisher;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let publisher = JetStreamPublisher::connect(&Default::default()).await?;
//! let events = EventDispatcher::new(Arc::new(publisher));
//!
//! let service = ItemService::new(InMemoryItemRepository::new(), events);
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod events;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{ItemError, ItemResult};
pub use events::{EventDispatcher, ItemEvent, ItemEventPublisher, ItemEventType, PublishFailure};
pub use handlers::ApiDoc;
pub use memory::InMemoryItemRepository;
pub use models::{CreateItem, DeleteItem, Item, UpdateItem};
pub use repository::ItemRepository;
pub use service::ItemService;
