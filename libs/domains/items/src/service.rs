//! Item Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;

use crate::error::ItemResult;
use crate::events::{EventDispatcher, ItemEvent, ItemEventType};
use crate::models::Item;
use crate::repository::ItemRepository;

/// Item service providing the store operations exposed over HTTP
///
/// Every successful mutation hands an event to the dispatcher after the
/// store call has returned, so the store lock is never held while
/// publishing.
pub struct ItemService<R: ItemRepository> {
    repository: Arc<R>,
    events: EventDispatcher,
}

impl<R: ItemRepository> ItemService<R> {
    pub fn new(repository: R, events: EventDispatcher) -> Self {
        Self {
            repository: Arc::new(repository),
            events,
        }
    }

    pub fn events(&self) -> &EventDispatcher {
        &self.events
    }

    #[instrument(skip(self))]
    pub async fn list_items(&self) -> Vec<Item> {
        self.repository.list().await
    }

    #[instrument(skip(self))]
    pub async fn create_item(&self, name: String) -> Item {
        let item = self.repository.create(name).await;
        self.events.dispatch(ItemEvent::new(ItemEventType::Created, item.clone()));
        item
    }

    #[instrument(skip(self))]
    pub async fn update_item(&self, id: i64, name: String) -> ItemResult<Item> {
        let item = self.repository.update(id, name).await?;
        self.events.dispatch(ItemEvent::new(ItemEventType::Updated, item.clone()));
        Ok(item)
    }

    #[instrument(skip(self))]
    pub async fn delete_item(&self, id: i64) -> ItemResult<Item> {
        let item = self.repository.delete(id).await?;
        self.events.dispatch(ItemEvent::new(ItemEventType::Deleted, item.clone()));
        Ok(item)
    }

    pub async fn item_count(&self) -> usize {
        self.repository.count().await
    }
}

impl<R: ItemRepository> Clone for ItemService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            events: self.events.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ItemError;
    use crate::events::{ItemEventPublisher, MockItemEventPublisher};
    use crate::memory::InMemoryItemRepository;
    use crate::repository::MockItemRepository;
    use async_trait::async_trait;
    use messaging::MessagingError;
    use mockall::predicate::eq;
    use std::time::Duration;
    use tokio::sync::mpsc;

    /// A publisher mock that forwards every event to the returned receiver.
    fn recording_publisher() -> (MockItemEventPublisher, mpsc::UnboundedReceiver<ItemEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut publisher = MockItemEventPublisher::new();
        publisher.expect_publish().returning(move |event| {
            let _ = tx.send(event);
            Ok(())
        });
        (publisher, rx)
    }

    #[tokio::test]
    async fn test_create_dispatches_created_event() {
        let mut repo = MockItemRepository::new();
        repo.expect_create()
            .with(eq("A".to_string()))
            .returning(|name| Item::new(1, name));
        let (publisher, mut events) = recording_publisher();

        let service = ItemService::new(repo, EventDispatcher::new(Arc::new(publisher)));
        let item = service.create_item("A".into()).await;

        assert_eq!(item, Item::new(1, "A"));
        let event = events.recv().await.unwrap();
        assert_eq!(event.event_type, ItemEventType::Created);
        assert_eq!(event.item, item);
    }

    #[tokio::test]
    async fn test_update_dispatches_updated_event() {
        let mut repo = MockItemRepository::new();
        repo.expect_update()
            .with(eq(1), eq("B".to_string()))
            .returning(|id, name| Ok(Item::new(id, name)));
        let (publisher, mut events) = recording_publisher();

        let service = ItemService::new(repo, EventDispatcher::new(Arc::new(publisher)));
        service.update_item(1, "B".into()).await.unwrap();

        let event = events.recv().await.unwrap();
        assert_eq!(event.event_type, ItemEventType::Updated);
        assert_eq!(event.item, Item::new(1, "B"));
    }

    #[tokio::test]
    async fn test_delete_dispatches_deleted_event() {
        let mut repo = MockItemRepository::new();
        repo.expect_delete()
            .with(eq(2))
            .returning(|id| Ok(Item::new(id, "gone")));
        let (publisher, mut events) = recording_publisher();

        let service = ItemService::new(repo, EventDispatcher::new(Arc::new(publisher)));
        let deleted = service.delete_item(2).await.unwrap();

        assert_eq!(deleted, Item::new(2, "gone"));
        assert_eq!(events.recv().await.unwrap().event_type, ItemEventType::Deleted);
    }

    #[tokio::test]
    async fn test_failed_mutation_publishes_nothing() {
        let mut repo = MockItemRepository::new();
        repo.expect_update().returning(|id, _| Err(ItemError::NotFound(id)));
        repo.expect_delete().returning(|id| Err(ItemError::NotFound(id)));
        let mut publisher = MockItemEventPublisher::new();
        publisher.expect_publish().never();

        let service = ItemService::new(repo, EventDispatcher::new(Arc::new(publisher)));

        assert_eq!(
            service.update_item(5, "x".into()).await.unwrap_err(),
            ItemError::NotFound(5)
        );
        assert_eq!(
            service.delete_item(5).await.unwrap_err(),
            ItemError::NotFound(5)
        );
    }

    #[tokio::test]
    async fn test_list_does_not_publish() {
        let mut repo = MockItemRepository::new();
        repo.expect_list().returning(|| vec![Item::new(1, "A")]);
        repo.expect_count().returning(|| 1);

        let service = ItemService::new(repo, EventDispatcher::disabled());

        assert_eq!(service.list_items().await, vec![Item::new(1, "A")]);
        assert_eq!(service.item_count().await, 1);
    }

    /// Publishes `Created` events slowly and records everything it sees.
    struct LaggingPublisher {
        published: mpsc::UnboundedSender<ItemEventType>,
    }

    #[async_trait]
    impl ItemEventPublisher for LaggingPublisher {
        async fn publish(&self, event: ItemEvent) -> Result<(), MessagingError> {
            if event.event_type == ItemEventType::Created {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            let _ = self.published.send(event.event_type);
            Ok(())
        }

        async fn is_connected(&self) -> bool {
            true
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_mutations_publish_in_store_order_despite_slow_broker() {
        let (tx, mut published) = mpsc::unbounded_channel();
        let events = EventDispatcher::new(Arc::new(LaggingPublisher { published: tx }));
        let service = ItemService::new(InMemoryItemRepository::new(), events);

        let item = service.create_item("A".into()).await;
        service.update_item(item.id, "B".into()).await.unwrap();
        service.delete_item(item.id).await.unwrap();

        let mut order = Vec::new();
        for _ in 0..3 {
            order.push(published.recv().await.unwrap());
        }
        assert_eq!(
            order,
            vec![
                ItemEventType::Created,
                ItemEventType::Updated,
                ItemEventType::Deleted
            ]
        );
    }
}
