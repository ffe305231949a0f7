use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnSchema {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnSchema>,
}

/// Structural description of the tables the model may reason about.
///
/// Tables are kept sorted by name so the serialized form, and therefore the
/// prompt, is stable for the same database shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SchemaSnapshot {
    tables: Vec<TableSchema>,
    fetched_at: DateTime<Utc>,
}

impl SchemaSnapshot {
    #[must_use]
    pub fn new(mut tables: Vec<TableSchema>, fetched_at: DateTime<Utc>) -> Self {
        tables.sort_by(|a, b| a.name.cmp(&b.name));
        Self { tables, fetched_at }
    }

    /// Groups `(table, column)` rows that arrive in ordinal order.
    #[must_use]
    pub fn from_columns<I>(rows: I, fetched_at: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = (String, ColumnSchema)>,
    {
        let mut tables: Vec<TableSchema> = Vec::new();
        for (table, column) in rows {
            match tables.iter_mut().find(|t| t.name == table) {
                Some(existing) => existing.columns.push(column),
                None => tables.push(TableSchema { name: table, columns: vec![column] }),
            }
        }
        Self::new(tables, fetched_at)
    }

    #[must_use]
    pub fn tables(&self) -> &[TableSchema] {
        &self.tables
    }

    #[must_use]
    pub const fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    #[must_use]
    pub fn is_stale(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        let age = now.signed_duration_since(self.fetched_at);
        age.to_std().is_ok_and(|age| age >= ttl)
    }

    /// JSON embedded in the prompt. Excludes `fetched_at`.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_prompt_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(name: &str) -> ColumnSchema {
        ColumnSchema { name: name.to_owned(), data_type: "text".to_owned(), nullable: true }
    }

    #[test]
    fn test_from_columns_groups_and_sorts() {
        let rows = vec![
            ("inventory".to_owned(), col("id")),
            ("inventory".to_owned(), col("name")),
            ("category".to_owned(), col("id")),
        ];
        let snapshot = SchemaSnapshot::from_columns(rows, Utc::now());
        let names: Vec<&str> = snapshot.tables().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["category", "inventory"]);
        let inventory = &snapshot.tables()[1];
        let cols: Vec<&str> = inventory.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(cols, vec!["id", "name"]);
    }

    #[test]
    fn test_prompt_json_ignores_fetch_time() {
        let tables = vec![TableSchema { name: "inventory".to_owned(), columns: vec![col("id")] }];
        let a = SchemaSnapshot::new(tables.clone(), Utc::now());
        let b = SchemaSnapshot::new(tables, Utc::now() - chrono::Duration::days(1));
        assert_eq!(a.to_prompt_json().unwrap(), b.to_prompt_json().unwrap());
    }

    #[test]
    fn test_staleness() {
        let now = Utc::now();
        let snapshot = SchemaSnapshot::new(vec![], now - chrono::Duration::seconds(120));
        assert!(snapshot.is_stale(now, Duration::from_secs(60)));
        assert!(!snapshot.is_stale(now, Duration::from_secs(300)));
    }
}
