//! Process-memory item store.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{ItemError, ItemResult};
use crate::models::Item;
use crate::repository::ItemRepository;

struct ItemTable {
    items: Vec<Item>,
    next_id: i64,
}

/// Item store backed by a `Vec` behind a single mutex.
///
/// The sequence and the id counter share the lock, so ids are handed out
/// strictly increasing from 1 and never reused after a delete.
pub struct InMemoryItemRepository {
    table: Mutex<ItemTable>,
}

impl InMemoryItemRepository {
    pub fn new() -> Self {
        Self {
            table: Mutex::new(ItemTable {
                items: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for InMemoryItemRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn list(&self) -> Vec<Item> {
        self.table.lock().await.items.clone()
    }

    async fn create(&self, name: String) -> Item {
        let mut table = self.table.lock().await;
        let item = Item::new(table.next_id, name);
        table.next_id += 1;
        table.items.push(item.clone());
        item
    }

    async fn get(&self, id: i64) -> ItemResult<Item> {
        self.table
            .lock()
            .await
            .items
            .iter()
            .find(|item| item.id == id)
            .cloned()
            .ok_or(ItemError::NotFound(id))
    }

    async fn update(&self, id: i64, name: String) -> ItemResult<Item> {
        let mut table = self.table.lock().await;
        let slot = table
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(ItemError::NotFound(id))?;

        *slot = Item::new(id, name);
        Ok(slot.clone())
    }

    async fn delete(&self, id: i64) -> ItemResult<Item> {
        let mut table = self.table.lock().await;
        let index = table
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or(ItemError::NotFound(id))?;

        Ok(table.items.remove(index))
    }

    async fn count(&self) -> usize {
        self.table.lock().await.items.len()
    }
}
