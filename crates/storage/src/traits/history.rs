use async_trait::async_trait;
use inventory_chat_core::{ActionKind, HistoryEntry};

use crate::error::StorageError;

/// Logged chat interactions.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// The user's most recent interactions, oldest first.
    async fn history(&self, username: &str, limit: i64) -> Result<Vec<HistoryEntry>, StorageError>;

    /// Record one interaction outside of any statement execution.
    async fn append_history(
        &self,
        username: &str,
        action: ActionKind,
        entry: &HistoryEntry,
    ) -> Result<(), StorageError>;
}
