//! Generated statement handling: script splitting, classification and
//! VALUES-batch splitting.
//!
//! Scripts are parsed with the PostgreSQL dialect of `sqlparser`; everything
//! the policy looks at (kind, tables, functions) comes from the AST, and the
//! text that runs is the AST rendered back to SQL.

mod analysis;
mod batch;

use std::fmt;

use serde::{Deserialize, Serialize};
use sqlparser::ast::Statement as SqlStatement;
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::{Parser, ParserError};
use thiserror::Error;

pub use batch::split_oversized;

/// A script the PostgreSQL grammar does not accept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(transparent)]
pub struct ParseError(#[from] ParserError);

/// Operation class of a single statement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    /// Queries and EXPLAIN with nothing inside that writes.
    Read,
    Insert,
    Update,
    Delete,
    Merge,
    /// DDL and privilege changes, including `SELECT ... INTO`.
    Schema,
    /// Anything else: transaction control, COPY, SET, CALL, DO, ...
    Other,
}

impl StatementKind {
    #[must_use]
    pub const fn is_read_only(self) -> bool {
        matches!(self, Self::Read)
    }

    #[must_use]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Insert | Self::Update | Self::Delete | Self::Merge)
    }

    /// Kinds whose VALUES list is subject to the per-statement tuple limit.
    #[must_use]
    pub const fn is_batchable(self) -> bool {
        matches!(self, Self::Insert | Self::Update)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Merge => "merge",
            Self::Schema => "schema",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed statement of a generated script.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Statement {
    text: String,
    kind: StatementKind,
    /// Lowercased, unquoted relation names, schema-qualified when written so.
    #[serde(skip)]
    relations: Vec<String>,
    /// Lowercased, unquoted names of every function called, table functions included.
    #[serde(skip)]
    functions: Vec<String>,
    #[serde(skip)]
    ast: SqlStatement,
}

impl Statement {
    fn from_ast(ast: SqlStatement) -> Self {
        let analysis = analysis::analyze(&ast);
        Self {
            text: ast.to_string(),
            kind: analysis.kind,
            relations: analysis.relations,
            functions: analysis.functions,
            ast,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn kind(&self) -> StatementKind {
        self.kind
    }

    #[must_use]
    pub fn relations(&self) -> &[String] {
        &self.relations
    }

    #[must_use]
    pub fn functions(&self) -> &[String] {
        &self.functions
    }

    /// Whether the statement is a plain query that can be nested as a subquery.
    #[must_use]
    pub const fn is_query(&self) -> bool {
        matches!(self.ast, SqlStatement::Query(_))
    }

    /// Whether any relation's table name equals one of `names` (case-insensitive),
    /// regardless of schema qualification.
    #[must_use]
    pub fn references_any(&self, names: &[String]) -> bool {
        self.relations
            .iter()
            .map(|relation| analysis::unqualified(relation))
            .any(|table| names.iter().any(|n| n.eq_ignore_ascii_case(table)))
    }

    /// Whether the statement touches a PostgreSQL catalog (`pg_*`,
    /// `information_schema`).
    #[must_use]
    pub fn references_catalog(&self) -> bool {
        self.relations.iter().any(|relation| analysis::is_catalog_relation(relation))
    }

    /// Each tuple of the first VALUES list, rendered as SQL, in order.
    #[must_use]
    pub fn value_tuples(&self) -> Vec<String> {
        batch::first_values_rows(&self.ast)
            .map(|rows| rows.iter().map(|row| batch::render_row(row)).collect())
            .unwrap_or_default()
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Parses a script into its statements. Comments and empty statements
/// disappear; each statement's text is its normalized rendering.
///
/// # Errors
/// Returns a [`ParseError`] when the script is not valid PostgreSQL.
pub fn split_script(sql: &str) -> Result<Vec<Statement>, ParseError> {
    let parsed = Parser::parse_sql(&PostgreSqlDialect {}, sql)?;
    Ok(parsed.into_iter().map(Statement::from_ast).collect())
}
