//! HistoryStore implementation for PgStorage.

use async_trait::async_trait;
use inventory_chat_core::{ActionKind, HistoryEntry};

use super::{HISTORY_COLUMNS, PgStorage, row_to_history};
use crate::error::StorageError;
use crate::traits::HistoryStore;

pub(crate) const INSERT_HISTORY: &str =
    "INSERT INTO history_chat (username, action, request, response, sql_script, rows_affected, created_at)
     VALUES ($1, $2, $3, $4, $5, $6, $7)";

#[async_trait]
impl HistoryStore for PgStorage {
    async fn history(&self, username: &str, limit: i64) -> Result<Vec<HistoryEntry>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {HISTORY_COLUMNS} FROM (
                 SELECT id, {HISTORY_COLUMNS} FROM history_chat
                 WHERE username = $1
                 ORDER BY created_at DESC, id DESC
                 LIMIT $2
             ) recent
             ORDER BY created_at ASC, id ASC"
        ))
        .bind(username)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_history).collect()
    }

    async fn append_history(
        &self,
        username: &str,
        action: ActionKind,
        entry: &HistoryEntry,
    ) -> Result<(), StorageError> {
        sqlx::query(INSERT_HISTORY)
            .bind(username)
            .bind(action.as_str())
            .bind(&entry.request)
            .bind(&entry.response)
            .bind(&entry.sql_script)
            .bind(None::<i64>)
            .bind(entry.created_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
