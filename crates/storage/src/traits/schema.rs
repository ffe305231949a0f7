use async_trait::async_trait;
use inventory_chat_core::SchemaSnapshot;

use crate::error::StorageError;

#[async_trait]
pub trait SchemaStore: Send + Sync {
    /// Snapshot of the public tables and their columns, leaving out `exclude`.
    async fn fetch_schema(&self, exclude: &[String]) -> Result<SchemaSnapshot, StorageError>;
}
