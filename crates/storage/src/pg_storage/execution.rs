//! ActionExecutor implementation for PgStorage.

use async_trait::async_trait;
use chrono::Utc;
use inventory_chat_core::constants::MAX_RESULT_ROWS;
use inventory_chat_core::{ExecutionReport, GeneratedAction, Statement, StatementKind, StatementResult};
use sqlx::{Postgres, Transaction};

use super::PgStorage;
use super::history::INSERT_HISTORY;
use crate::error::StorageError;
use crate::pg_migrations::quoted_role;
use crate::traits::ActionExecutor;

/// Query returning the rows of a read statement as one JSON array, capped at
/// [`MAX_RESULT_ROWS`]. `None` for anything that cannot be used as a subquery
/// (`EXPLAIN`, writes).
fn wrap_read(statement: &Statement) -> Option<String> {
    if statement.kind() != StatementKind::Read || !statement.is_query() {
        return None;
    }
    let text = statement.text();
    Some(format!(
        "SELECT COALESCE(jsonb_agg(to_jsonb(q)), '[]'::jsonb) FROM (SELECT * FROM ({text}\n) AS source LIMIT {MAX_RESULT_ROWS}) AS q"
    ))
}

fn set_role_sql() -> String {
    format!("SET LOCAL ROLE {}", quoted_role())
}

fn count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

async fn run_statement(
    tx: &mut Transaction<'_, Postgres>,
    statement: &Statement,
) -> Result<StatementResult, sqlx::Error> {
    if let Some(query) = wrap_read(statement) {
        let value: serde_json::Value = sqlx::query_scalar(&query).fetch_one(&mut **tx).await?;
        let rows = match value {
            serde_json::Value::Array(rows) => rows,
            serde_json::Value::Null => Vec::new(),
            other => vec![other],
        };
        return Ok(StatementResult {
            statement: statement.text().to_owned(),
            kind: statement.kind(),
            rows_affected: count(rows.len()),
            rows,
        });
    }

    let done = sqlx::query(statement.text()).execute(&mut **tx).await?;
    Ok(StatementResult {
        statement: statement.text().to_owned(),
        kind: statement.kind(),
        rows_affected: done.rows_affected(),
        rows: Vec::new(),
    })
}

/// Runs the statements of `action` inside `tx` as the restricted role,
/// in a read-only transaction when the action asks for one.
async fn run_generated(
    tx: &mut Transaction<'_, Postgres>,
    action: &GeneratedAction,
) -> Result<Vec<StatementResult>, StorageError> {
    if action.read_only {
        sqlx::query("SET TRANSACTION READ ONLY").execute(&mut **tx).await?;
    }
    sqlx::query(&set_role_sql()).execute(&mut **tx).await?;

    let mut results = Vec::with_capacity(action.statements.len());
    for (index, statement) in action.statements.iter().enumerate() {
        let result = run_statement(tx, statement)
            .await
            .map_err(|source| StorageError::StatementFailed { index, source })?;
        tracing::debug!(
            index,
            kind = %result.kind,
            rows_affected = result.rows_affected,
            "statement executed"
        );
        results.push(result);
    }
    sqlx::query("RESET ROLE").execute(&mut **tx).await?;
    Ok(results)
}

#[async_trait]
impl ActionExecutor for PgStorage {
    async fn execute(&self, action: &GeneratedAction) -> Result<ExecutionReport, StorageError> {
        let mut tx = self.pool.begin().await?;
        let results = if action.statements.is_empty() {
            Vec::new()
        } else {
            run_generated(&mut tx, action).await?
        };

        let report = ExecutionReport { results, executed_at: Utc::now() };
        let rows_affected = i64::try_from(report.rows_affected()).unwrap_or(i64::MAX);

        // A read-only transaction cannot hold the history row; it gets its own.
        if action.read_only {
            tx.commit().await?;
            tx = self.pool.begin().await?;
        }
        sqlx::query(INSERT_HISTORY)
            .bind(&action.username)
            .bind(action.action.as_str())
            .bind(&action.request)
            .bind(&action.response)
            .bind(&action.sql_script)
            .bind((!action.statements.is_empty()).then_some(rows_affected))
            .bind(report.executed_at)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!(
            username = %action.username,
            statements = action.statements.len(),
            read_only = action.read_only,
            rows_affected,
            "action executed"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use inventory_chat_core::split_script;

    use super::*;

    fn one(sql: &str) -> Statement {
        split_script(sql).unwrap().remove(0)
    }

    #[test]
    fn test_wrap_select() {
        let wrapped = wrap_read(&one("select name from inventory")).unwrap();
        assert!(wrapped.starts_with("SELECT COALESCE(jsonb_agg(to_jsonb(q)), '[]'::jsonb)"));
        assert!(wrapped.contains("FROM (SELECT name FROM inventory\n) AS source LIMIT 500"));
    }

    #[test]
    fn test_wrap_cte_and_values() {
        assert!(wrap_read(&one("WITH x AS (SELECT 1) SELECT * FROM x")).is_some());
        assert!(wrap_read(&one("VALUES (1), (2)")).is_some());
        assert!(wrap_read(&one("(SELECT 1)")).is_some());
    }

    #[test]
    fn test_no_wrap_for_explain_or_writes() {
        assert!(wrap_read(&one("EXPLAIN SELECT 1")).is_none());
        assert!(wrap_read(&one("DELETE FROM inventory")).is_none());
        assert!(wrap_read(&one("WITH d AS (UPDATE inventory SET quantity = 0 RETURNING *) SELECT * FROM d"))
            .is_none());
    }

    #[test]
    fn test_generated_statements_switch_to_restricted_role() {
        assert_eq!(set_role_sql(), "SET LOCAL ROLE \"inventory_chat_generated\"");
    }
}
