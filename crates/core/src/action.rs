use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identity::{SessionToken, UserIdentity};
use crate::statement::{Statement, StatementKind};

/// Action name recorded with every chat turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    #[default]
    AskAi,
}

impl ActionKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AskAi => "ask_ai",
        }
    }
}

/// A generated script waiting for the user's decision.
///
/// Holds the statements exactly as they passed the policy, so what the user
/// confirms is what runs.
#[derive(Debug, Clone, Serialize)]
pub struct PendingAction {
    pub id: Uuid,
    pub kind: ActionKind,
    pub request: String,
    pub explanation: String,
    /// Script as returned by the model.
    pub statement: Option<String>,
    /// Policy-approved statements, in execution order.
    pub statements: Vec<Statement>,
    #[serde(skip)]
    pub session_token: SessionToken,
    pub created_at: DateTime<Utc>,
}

impl PendingAction {
    #[must_use]
    pub fn new(
        request: impl Into<String>,
        explanation: impl Into<String>,
        statement: Option<String>,
        statements: Vec<Statement>,
        session_token: SessionToken,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: ActionKind::AskAi,
            request: request.into(),
            explanation: explanation.into(),
            statement,
            statements,
            session_token,
            created_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn requires_confirmation(&self) -> bool {
        !self.statements.is_empty()
    }

    /// Hands the action to execution on behalf of `identity`. Actions of
    /// non-admins, and actions holding only reads, run read-only.
    #[must_use]
    pub fn into_generated(self, identity: &UserIdentity) -> GeneratedAction {
        let read_only =
            !identity.is_admin() || self.statements.iter().all(|s| s.kind().is_read_only());
        GeneratedAction {
            action: self.kind,
            username: identity.username.clone(),
            request: self.request,
            response: self.explanation,
            sql_script: self.statement,
            statements: self.statements,
            read_only,
            session_token: self.session_token,
        }
    }
}

/// What the execution collaborator receives: the statements to run plus the
/// chat turn to record.
#[derive(Debug, Clone)]
pub struct GeneratedAction {
    pub action: ActionKind,
    pub username: String,
    pub request: String,
    pub response: String,
    pub sql_script: Option<String>,
    pub statements: Vec<Statement>,
    /// Statements must run in a read-only transaction.
    pub read_only: bool,
    pub session_token: SessionToken,
}

impl GeneratedAction {
    /// A turn with nothing to run; only the exchange is recorded.
    #[must_use]
    pub fn record_only(
        username: impl Into<String>,
        request: impl Into<String>,
        response: impl Into<String>,
        session_token: SessionToken,
    ) -> Self {
        Self {
            action: ActionKind::AskAi,
            username: username.into(),
            request: request.into(),
            response: response.into(),
            sql_script: None,
            statements: Vec::new(),
            read_only: false,
            session_token,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementResult {
    pub statement: String,
    pub kind: StatementKind,
    pub rows_affected: u64,
    /// Rows returned by read statements, one JSON object per row.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub results: Vec<StatementResult>,
    pub executed_at: DateTime<Utc>,
}

impl ExecutionReport {
    #[must_use]
    pub fn rows_affected(&self) -> u64 {
        self.results.iter().map(|r| r.rows_affected).sum()
    }
}
