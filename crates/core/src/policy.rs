//! Application-side statement policy.
//!
//! The prompt asks the model to respect the same rules, but nothing the model
//! returns is trusted: every script is re-checked here before a user is ever
//! offered the chance to confirm it.

use crate::config::PolicyConfig;
use crate::error::{PipelineFailure, PipelineResult};
use crate::identity::UserIdentity;
use crate::statement::{Statement, StatementKind, split_oversized, split_script};

#[derive(Debug, Clone, Default)]
pub struct StatementPolicy {
    config: PolicyConfig,
}

impl StatementPolicy {
    #[must_use]
    pub const fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Turns a generated script into the ordered statements that may be offered
    /// for confirmation.
    ///
    /// An empty result means the script held no statements (blank, or comments only).
    ///
    /// # Errors
    /// - [`PipelineFailure::AuthorizationDenied`] when a non-admin receives anything
    ///   other than a read-only statement.
    /// - [`PipelineFailure::PolicyViolation`] for unparsable scripts, unsupported or
    ///   schema-changing statements, protected or catalog tables, function calls
    ///   outside the allowlist, or oversized batches.
    pub fn evaluate(
        &self,
        identity: &UserIdentity,
        sql_script: &str,
    ) -> PipelineResult<Vec<Statement>> {
        let statements = split_script(sql_script)
            .map_err(|e| PipelineFailure::PolicyViolation(format!("unreadable statement: {e}")))?;

        self.authorize(identity, &statements)?;
        self.check_structure(&statements)?;

        let mut expanded = Vec::with_capacity(statements.len());
        for statement in &statements {
            let parts = split_oversized(statement, self.config.max_values_per_statement);
            if parts.len() > 1 {
                tracing::debug!(
                    parts = parts.len(),
                    max_values = self.config.max_values_per_statement,
                    "split oversized VALUES batch"
                );
            }
            expanded.extend(parts);
        }

        if expanded.len() > self.config.max_statements_per_batch {
            return Err(PipelineFailure::PolicyViolation(format!(
                "batch expands to {} statements, limit is {}",
                expanded.len(),
                self.config.max_statements_per_batch
            )));
        }
        Ok(expanded)
    }

    /// Role check: only admins may run statements that are not read-only.
    ///
    /// # Errors
    /// Returns [`PipelineFailure::AuthorizationDenied`] naming the first offending kind.
    pub fn authorize(&self, identity: &UserIdentity, statements: &[Statement]) -> PipelineResult<()> {
        if identity.is_admin() {
            return Ok(());
        }
        match statements.iter().find(|s| !s.kind().is_read_only()) {
            Some(statement) => Err(PipelineFailure::AuthorizationDenied {
                username: identity.username.clone(),
                kind: statement.kind(),
            }),
            None => Ok(()),
        }
    }

    fn check_structure(&self, statements: &[Statement]) -> PipelineResult<()> {
        for statement in statements {
            match statement.kind() {
                StatementKind::Other => {
                    return Err(PipelineFailure::PolicyViolation(
                        "unsupported statement type".to_owned(),
                    ));
                },
                StatementKind::Schema if !self.config.allow_schema_changes => {
                    return Err(PipelineFailure::PolicyViolation(
                        "schema changes are disabled".to_owned(),
                    ));
                },
                _ => {},
            }
            if statement.references_any(&self.config.protected_tables) {
                return Err(PipelineFailure::PolicyViolation(
                    "statement references a protected table".to_owned(),
                ));
            }
            if statement.references_catalog() {
                return Err(PipelineFailure::PolicyViolation(
                    "statement references a system catalog".to_owned(),
                ));
            }
            if let Some(function) = statement.functions().iter().find(|f| !self.allows_function(f)) {
                return Err(PipelineFailure::PolicyViolation(format!(
                    "function {function} is not allowed"
                )));
            }
        }
        Ok(())
    }

    fn allows_function(&self, name: &str) -> bool {
        let name = name.strip_prefix("pg_catalog.").unwrap_or(name);
        self.config.allowed_functions.iter().any(|allowed| allowed.eq_ignore_ascii_case(name))
    }
}
