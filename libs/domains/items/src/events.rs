//! Item change events and their ordered, fire-and-forget dispatch.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use messaging::{JetStreamPublisher, MessagingError};
use metrics::counter;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error};
use utoipa::ToSchema;

use crate::models::Item;

const FAILURE_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ItemEventType {
    #[serde(rename = "item.created")]
    Created,
    #[serde(rename = "item.updated")]
    Updated,
    #[serde(rename = "item.deleted")]
    Deleted,
}

impl ItemEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemEventType::Created => "item.created",
            ItemEventType::Updated => "item.updated",
            ItemEventType::Deleted => "item.deleted",
        }
    }
}

impl fmt::Display for ItemEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Envelope published to the item events queue.
///
/// ```json
/// {"type":"item.created","item":{"id":1,"name":"A"},"timestamp":"2024-01-01T00:00:00Z"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ItemEvent {
    #[serde(rename = "type")]
    pub event_type: ItemEventType,
    pub item: Item,
    pub timestamp: DateTime<Utc>,
}

impl ItemEvent {
    /// Stamp `item` with the current time.
    pub fn new(event_type: ItemEventType, item: Item) -> Self {
        Self {
            event_type,
            item,
            timestamp: Utc::now(),
        }
    }
}

/// Sink for item events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemEventPublisher: Send + Sync {
    async fn publish(&self, event: ItemEvent) -> Result<(), MessagingError>;

    async fn is_connected(&self) -> bool;
}

#[async_trait]
impl ItemEventPublisher for JetStreamPublisher {
    async fn publish(&self, event: ItemEvent) -> Result<(), MessagingError> {
        JetStreamPublisher::publish(self, &event).await.map(|_| ())
    }

    async fn is_connected(&self) -> bool {
        JetStreamPublisher::is_connected(self).await
    }
}

/// A publish that did not reach the broker.
#[derive(Debug, Clone)]
pub struct PublishFailure {
    pub event: ItemEvent,
    pub error: Arc<MessagingError>,
}

/// Hands events to a single background publishing task.
///
/// Events are queued in mutation order and published one at a time, so the
/// broker sees them in the same order the store applied them. Callers never
/// wait for the broker. A failed publish is logged, counted in
/// `item_events_publish_failures_total` and sent to
/// [`subscribe_failures`](Self::subscribe_failures) receivers; nothing is
/// returned to the caller.
///
/// The worker exits once every clone of the dispatcher is dropped.
#[derive(Clone)]
pub struct EventDispatcher {
    publisher: Option<Arc<dyn ItemEventPublisher>>,
    queue: Option<mpsc::UnboundedSender<ItemEvent>>,
    failures: broadcast::Sender<PublishFailure>,
}

impl EventDispatcher {
    /// Start the publishing worker. Must be called inside a Tokio runtime.
    pub fn new(publisher: Arc<dyn ItemEventPublisher>) -> Self {
        let (failures, _) = broadcast::channel(FAILURE_CHANNEL_CAPACITY);
        let (queue, events) = mpsc::unbounded_channel();

        tokio::spawn(publish_worker(
            Arc::clone(&publisher),
            events,
            failures.clone(),
        ));

        Self {
            publisher: Some(publisher),
            queue: Some(queue),
            failures,
        }
    }

    /// A dispatcher that drops every event.
    pub fn disabled() -> Self {
        let (failures, _) = broadcast::channel(FAILURE_CHANNEL_CAPACITY);
        Self {
            publisher: None,
            queue: None,
            failures,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.queue.is_some()
    }

    pub async fn broker_connected(&self) -> bool {
        match &self.publisher {
            Some(publisher) => publisher.is_connected().await,
            None => false,
        }
    }

    pub fn subscribe_failures(&self) -> broadcast::Receiver<PublishFailure> {
        self.failures.subscribe()
    }

    /// Queue `event` for publishing.
    ///
    /// Returns `false` when the event was dropped because no publisher is
    /// configured or the worker has stopped.
    pub fn dispatch(&self, event: ItemEvent) -> bool {
        let Some(queue) = &self.queue else {
            debug!(
                event_type = %event.event_type,
                item_id = event.item.id,
                "No event publisher configured, dropping event"
            );
            return false;
        };

        match queue.send(event) {
            Ok(()) => true,
            Err(mpsc::error::SendError(event)) => {
                error!(
                    event_type = %event.event_type,
                    item_id = event.item.id,
                    "Event publisher stopped, dropping event"
                );
                false
            }
        }
    }
}

async fn publish_worker(
    publisher: Arc<dyn ItemEventPublisher>,
    mut events: mpsc::UnboundedReceiver<ItemEvent>,
    failures: broadcast::Sender<PublishFailure>,
) {
    while let Some(event) = events.recv().await {
        let event_type = event.event_type;
        let item_id = event.item.id;

        match publisher.publish(event.clone()).await {
            Ok(()) => debug!(%event_type, item_id, "Published item event"),
            Err(e) => {
                error!(error = %e, %event_type, item_id, "Failed to publish item event");
                counter!("item_events_publish_failures_total", "type" => event_type.as_str())
                    .increment(1);
                // No receivers is fine
                let _ = failures.send(PublishFailure {
                    event,
                    error: Arc::new(e),
                });
            }
        }
    }

    debug!("Event publisher worker stopped");
}
