use async_trait::async_trait;
use inventory_chat_core::InventoryItem;

use crate::error::StorageError;

#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Items owned by `username`, most recently updated first.
    async fn inventory_for(&self, username: &str) -> Result<Vec<InventoryItem>, StorageError>;
}
