use crate::constants::{
    DEFAULT_ALLOWED_FUNCTIONS, DEFAULT_MAX_STATEMENTS_PER_BATCH, DEFAULT_MAX_VALUES_PER_STATEMENT,
    DEFAULT_PROTECTED_TABLES,
};
use crate::env_config::{env_flag, env_list_with_default, env_parse_with_default};

/// Limits applied to every generated statement before it can be confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyConfig {
    /// Maximum value tuples per INSERT/UPDATE statement; larger lists are split.
    pub max_values_per_statement: usize,
    /// Maximum statements one reply may expand into after splitting.
    pub max_statements_per_batch: usize,
    /// Whether admins may run DDL statements.
    pub allow_schema_changes: bool,
    /// Tables no generated statement may reference.
    pub protected_tables: Vec<String>,
    /// Functions generated statements may call, unqualified or `pg_catalog.`-qualified.
    pub allowed_functions: Vec<String>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            max_values_per_statement: DEFAULT_MAX_VALUES_PER_STATEMENT,
            max_statements_per_batch: DEFAULT_MAX_STATEMENTS_PER_BATCH,
            allow_schema_changes: false,
            protected_tables: DEFAULT_PROTECTED_TABLES.iter().map(|s| (*s).to_owned()).collect(),
            allowed_functions: DEFAULT_ALLOWED_FUNCTIONS.iter().map(|s| (*s).to_owned()).collect(),
        }
    }
}

impl PolicyConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let max_values = env_parse_with_default(
            "INVENTORY_CHAT_MAX_VALUES_PER_STATEMENT",
            DEFAULT_MAX_VALUES_PER_STATEMENT,
        );
        let max_values = if max_values == 0 {
            tracing::warn!(
                default = DEFAULT_MAX_VALUES_PER_STATEMENT,
                "INVENTORY_CHAT_MAX_VALUES_PER_STATEMENT must be positive, using default"
            );
            DEFAULT_MAX_VALUES_PER_STATEMENT
        } else {
            max_values
        };
        Self {
            max_values_per_statement: max_values,
            max_statements_per_batch: env_parse_with_default(
                "INVENTORY_CHAT_MAX_STATEMENTS_PER_BATCH",
                DEFAULT_MAX_STATEMENTS_PER_BATCH,
            ),
            allow_schema_changes: env_flag("INVENTORY_CHAT_ALLOW_SCHEMA_CHANGES", false),
            protected_tables: env_list_with_default(
                "INVENTORY_CHAT_PROTECTED_TABLES",
                &DEFAULT_PROTECTED_TABLES,
            ),
            allowed_functions: env_list_with_default(
                "INVENTORY_CHAT_ALLOWED_FUNCTIONS",
                &DEFAULT_ALLOWED_FUNCTIONS,
            ),
        }
    }
}
