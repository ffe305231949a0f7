use async_trait::async_trait;
use inventory_chat_core::{ExecutionReport, GeneratedAction};

use crate::error::StorageError;

/// Runs confirmed actions.
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    /// Run every statement of `action` in order inside one transaction and log
    /// the interaction to `history_chat` in that same transaction.
    ///
    /// An action without statements only records the interaction. On error
    /// nothing is committed.
    async fn execute(&self, action: &GeneratedAction) -> Result<ExecutionReport, StorageError>;
}
