//! SchemaStore implementation for PgStorage.

use async_trait::async_trait;
use chrono::Utc;
use inventory_chat_core::{ColumnSchema, SchemaSnapshot};
use sqlx::Row;

use super::PgStorage;
use crate::error::StorageError;
use crate::traits::SchemaStore;

#[async_trait]
impl SchemaStore for PgStorage {
    async fn fetch_schema(&self, exclude: &[String]) -> Result<SchemaSnapshot, StorageError> {
        let excluded: Vec<String> = exclude.iter().map(|t| t.to_lowercase()).collect();
        let rows = sqlx::query(
            "SELECT table_name::text AS table_name,
                    column_name::text AS column_name,
                    data_type::text AS data_type,
                    is_nullable = 'YES' AS nullable
             FROM information_schema.columns
             WHERE table_schema = 'public'
               AND NOT (lower(table_name::text) = ANY($1))
             ORDER BY table_name, ordinal_position",
        )
        .bind(&excluded)
        .fetch_all(&self.pool)
        .await?;

        let columns = rows
            .iter()
            .map(|r| {
                Ok((
                    r.try_get::<String, _>("table_name")?,
                    ColumnSchema {
                        name: r.try_get("column_name")?,
                        data_type: r.try_get("data_type")?,
                        nullable: r.try_get("nullable")?,
                    },
                ))
            })
            .collect::<Result<Vec<_>, StorageError>>()?;

        let snapshot = SchemaSnapshot::from_columns(columns, Utc::now());
        tracing::debug!(tables = snapshot.tables().len(), "schema snapshot fetched");
        Ok(snapshot)
    }
}
