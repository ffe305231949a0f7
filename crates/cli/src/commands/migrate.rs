use anyhow::Result;
use inventory_chat_storage::{PgStorage, run_pg_migrations};

use crate::get_database_url;

pub(crate) async fn run() -> Result<()> {
    let storage = PgStorage::connect(&get_database_url()?).await?;
    run_pg_migrations(storage.pool()).await?;
    println!("Migrations applied.");
    Ok(())
}
