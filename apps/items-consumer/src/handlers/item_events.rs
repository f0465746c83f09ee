//! Item event handler implementation

use async_trait::async_trait;
use domain_items::{ItemEvent, ItemEventType};
use eyre::Result;
use messaging::MessageHandler;
use tracing::{info, instrument};

/// Logs one line per item event.
pub struct ItemEventLogger;

/// `[CREATED] Item ID: 1, Name: A at 2024-01-01T00:00:00+00:00`
pub fn describe(event: &ItemEvent) -> String {
    let tag = match event.event_type {
        ItemEventType::Created => "CREATED",
        ItemEventType::Updated => "UPDATED",
        ItemEventType::Deleted => "DELETED",
    };

    format!(
        "[{}] Item ID: {}, Name: {} at {}",
        tag,
        event.item.id,
        event.item.name,
        event.timestamp.to_rfc3339()
    )
}

#[async_trait]
impl MessageHandler<ItemEvent> for ItemEventLogger {
    #[instrument(skip(self, event), fields(event_type = %event.event_type, item_id = event.item.id))]
    async fn handle(&self, event: ItemEvent) -> Result<()> {
        info!("{}", describe(&event));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "item-event-logger"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_items::Item;
    use messaging::{Disposition, decide};

    fn payload(event_type: &str) -> Vec<u8> {
        serde_json::to_vec(&serde_json::json!({
            "type": event_type,
            "item": {"id": 4, "name": "Lamp"},
            "timestamp": "2024-05-01T12:30:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_describe_each_event_type() {
        let item = Item::new(1, "A");

        for (event_type, tag) in [
            (ItemEventType::Created, "[CREATED]"),
            (ItemEventType::Updated, "[UPDATED]"),
            (ItemEventType::Deleted, "[DELETED]"),
        ] {
            let line = describe(&ItemEvent::new(event_type, item.clone()));
            assert!(line.starts_with(&format!("{tag} Item ID: 1, Name: A at ")), "{line}");
        }
    }

    #[test]
    fn test_describe_uses_event_timestamp() {
        let event: ItemEvent = serde_json::from_slice(&payload("item.updated")).unwrap();

        assert_eq!(
            describe(&event),
            "[UPDATED] Item ID: 4, Name: Lamp at 2024-05-01T12:30:00+00:00"
        );
    }

    #[tokio::test]
    async fn test_valid_event_is_acknowledged() {
        let disposition = decide::<ItemEvent, _>(&payload("item.deleted"), &ItemEventLogger).await;
        assert_eq!(disposition, Disposition::Ack);
    }

    #[tokio::test]
    async fn test_malformed_event_is_discarded() {
        assert_eq!(
            decide::<ItemEvent, _>(b"not json", &ItemEventLogger).await,
            Disposition::Discard
        );
        assert_eq!(
            decide::<ItemEvent, _>(&payload("item.renamed"), &ItemEventLogger).await,
            Disposition::Discard
        );
    }
}
