//! InventoryStore implementation for PgStorage.

use async_trait::async_trait;
use inventory_chat_core::InventoryItem;
use inventory_chat_core::constants::MAX_RESULT_ROWS;

use super::{INVENTORY_COLUMNS, PgStorage, row_to_inventory_item, usize_to_i64};
use crate::error::StorageError;
use crate::traits::InventoryStore;

#[async_trait]
impl InventoryStore for PgStorage {
    async fn inventory_for(&self, username: &str) -> Result<Vec<InventoryItem>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {INVENTORY_COLUMNS} FROM inventory
             WHERE owner = $1
             ORDER BY updated_at DESC, id DESC
             LIMIT $2"
        ))
        .bind(username)
        .bind(usize_to_i64(MAX_RESULT_ROWS))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_inventory_item).collect()
    }
}
