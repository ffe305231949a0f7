//! PostgreSQL schema migrations for inventory-chat storage.
//!
//! `account` and `account_session` belong to the surrounding web application;
//! they are created here only so a fresh database is usable on its own.
//!
//! Generated statements run as [`GENERATED_STATEMENT_ROLE`], a `NOLOGIN` role
//! with DML on `inventory` and nothing on the protected tables. Creating it
//! needs a connecting user with `CREATEROLE` (or superuser).

use anyhow::Result;
use inventory_chat_core::constants::GENERATED_STATEMENT_ROLE;
use sqlx::PgPool;

/// Run all PostgreSQL migrations.
pub async fn run_pg_migrations(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS account (
            username TEXT PRIMARY KEY,
            password_hash TEXT NOT NULL DEFAULT '',
            is_admin TEXT NOT NULL DEFAULT 'no',
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS account_session (
            token TEXT PRIMARY KEY,
            username TEXT NOT NULL REFERENCES account (username) ON DELETE CASCADE,
            issued_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            expires_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_account_session_user ON account_session (username)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS inventory (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            category TEXT,
            quantity INTEGER NOT NULL DEFAULT 0,
            location TEXT,
            owner TEXT NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_inventory_owner ON inventory (owner, updated_at DESC)")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS history_chat (
            id BIGSERIAL PRIMARY KEY,
            username TEXT NOT NULL,
            action TEXT NOT NULL DEFAULT 'ask_ai',
            request TEXT,
            response TEXT,
            sql_script TEXT,
            rows_affected BIGINT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_history_chat_user ON history_chat (username, created_at DESC)",
    )
    .execute(pool)
    .await?;

    ensure_generated_role(pool).await?;

    tracing::info!("PostgreSQL migrations completed");
    Ok(())
}

/// The role name as a quoted SQL identifier.
pub(crate) fn quoted_role() -> String {
    format!("\"{}\"", GENERATED_STATEMENT_ROLE.replace('"', "\"\""))
}

/// Creates the restricted role generated statements run as and resets its
/// privileges. The connecting user becomes a member so it can `SET ROLE`.
async fn ensure_generated_role(pool: &PgPool) -> Result<()> {
    let role = quoted_role();
    let literal = GENERATED_STATEMENT_ROLE.replace('\'', "''");

    sqlx::query(&format!(
        "DO $$ BEGIN \
             IF NOT EXISTS (SELECT 1 FROM pg_roles WHERE rolname = '{literal}') THEN \
                 CREATE ROLE {role} NOLOGIN; \
             END IF; \
         END $$"
    ))
    .execute(pool)
    .await?;

    let grants = [
        format!("GRANT {role} TO CURRENT_USER"),
        format!("REVOKE ALL ON account, account_session, history_chat FROM {role}"),
        format!("GRANT SELECT, INSERT, UPDATE, DELETE ON inventory TO {role}"),
        format!("GRANT USAGE ON SEQUENCE inventory_id_seq TO {role}"),
    ];
    for statement in &grants {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::info!(role = GENERATED_STATEMENT_ROLE, "Generated-statement role ready");
    Ok(())
}
