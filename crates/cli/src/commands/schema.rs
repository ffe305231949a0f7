use anyhow::Result;
use inventory_chat_core::PolicyConfig;
use inventory_chat_core::SchemaSnapshot;
use inventory_chat_storage::PgStorage;
use inventory_chat_storage::traits::SchemaStore;

use crate::get_database_url;

/// Snapshot the model would see, protected tables left out.
pub(crate) async fn fetch() -> Result<SchemaSnapshot> {
    let storage = PgStorage::connect(&get_database_url()?).await?;
    let policy = PolicyConfig::from_env();
    Ok(storage.fetch_schema(&policy.protected_tables).await?)
}

pub(crate) async fn run() -> Result<()> {
    let snapshot = fetch().await?;
    println!("{}", serde_json::to_string_pretty(snapshot.tables())?);
    Ok(())
}
