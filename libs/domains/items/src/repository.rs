use async_trait::async_trait;

use crate::error::ItemResult;
use crate::models::Item;

/// Repository trait for Item persistence
///
/// Implementations serialize every operation; callers never observe a
/// partially applied mutation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// All items in insertion order
    async fn list(&self) -> Vec<Item>;

    /// Store a new item under the next identifier
    async fn create(&self, name: String) -> Item;

    /// Get an item by ID
    async fn get(&self, id: i64) -> ItemResult<Item>;

    /// Replace the item with `id` in full
    async fn update(&self, id: i64, name: String) -> ItemResult<Item>;

    /// Remove the item with `id`, returning it
    async fn delete(&self, id: i64) -> ItemResult<Item>;

    /// Number of stored items
    async fn count(&self) -> usize;
}
