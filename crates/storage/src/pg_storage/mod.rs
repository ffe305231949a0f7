//! PostgreSQL storage backend using sqlx.
//!
//! Split into modular files by collaborator.

mod execution;
mod history;
mod identity;
mod inventory;
mod schema;

use std::time::Duration;

use chrono::{DateTime, Utc};
use inventory_chat_core::constants::{
    PG_POOL_ACQUIRE_TIMEOUT_SECS, PG_POOL_IDLE_TIMEOUT_SECS, PG_POOL_MAX_CONNECTIONS,
};
use inventory_chat_core::{HistoryEntry, InventoryItem};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

use crate::error::StorageError;
use crate::pg_migrations::run_pg_migrations;

#[derive(Clone, Debug)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    /// Connects and brings the schema up to date.
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let storage = Self::connect(database_url).await?;
        run_pg_migrations(&storage.pool).await.map_err(|e| StorageError::Migration(e.to_string()))?;
        tracing::info!("PgStorage initialized");
        Ok(storage)
    }

    /// Connects without running migrations.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(PG_POOL_MAX_CONNECTIONS)
            .acquire_timeout(Duration::from_secs(PG_POOL_ACQUIRE_TIMEOUT_SECS))
            .idle_timeout(Duration::from_secs(PG_POOL_IDLE_TIMEOUT_SECS))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

pub(crate) const HISTORY_COLUMNS: &str = "request, response, sql_script, created_at";

pub(crate) const INVENTORY_COLUMNS: &str =
    "id, name, category, quantity, location, owner, updated_at";

pub(crate) fn row_to_history(row: &sqlx::postgres::PgRow) -> Result<HistoryEntry, StorageError> {
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    Ok(HistoryEntry {
        request: row.try_get::<Option<String>, _>("request")?.unwrap_or_default(),
        response: row.try_get::<Option<String>, _>("response")?.unwrap_or_default(),
        sql_script: row.try_get("sql_script")?,
        created_at,
    })
}

pub(crate) fn row_to_inventory_item(
    row: &sqlx::postgres::PgRow,
) -> Result<InventoryItem, StorageError> {
    Ok(InventoryItem {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        category: row.try_get("category")?,
        quantity: row.try_get("quantity")?,
        location: row.try_get("location")?,
        owner: row.try_get("owner")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Convert `usize` to `i64` for SQL binds.
/// Saturates to `i64::MAX` on overflow (only possible on 128-bit targets).
pub(crate) fn usize_to_i64(val: usize) -> i64 {
    i64::try_from(val).unwrap_or(i64::MAX)
}
