use std::time::Duration;

use thiserror::Error;

use crate::constants::{
    AUTHORIZATION_DENIED_REPLY, FALLBACK_EXPLAIN, POLICY_VIOLATION_REPLY,
    SERVICE_UNAVAILABLE_REPLY, TIMEOUT_REPLY,
};
use crate::statement::StatementKind;

/// Ways a chat turn can fail to produce an executable action.
///
/// None of these are fatal: every variant degrades to a neutral assistant
/// message through [`PipelineFailure::user_message`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineFailure {
    #[error("completion service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("completion timed out after {0:?}")]
    Timeout(Duration),

    #[error("model output is not valid JSON: {0}")]
    MalformedModelOutput(String),

    #[error("user '{username}' may not run {kind} statements")]
    AuthorizationDenied { username: String, kind: StatementKind },

    #[error("policy violation: {0}")]
    PolicyViolation(String),
}

impl PipelineFailure {
    /// Neutral text shown in the conversation. Never carries technical detail.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::ServiceUnavailable(_) => SERVICE_UNAVAILABLE_REPLY,
            Self::Timeout(_) => TIMEOUT_REPLY,
            Self::MalformedModelOutput(_) => FALLBACK_EXPLAIN,
            Self::AuthorizationDenied { .. } => AUTHORIZATION_DENIED_REPLY,
            Self::PolicyViolation(_) => POLICY_VIOLATION_REPLY,
        }
    }

    /// Stable machine-readable name, used in API payloads and log fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ServiceUnavailable(_) => "service_unavailable",
            Self::Timeout(_) => "timeout",
            Self::MalformedModelOutput(_) => "malformed_model_output",
            Self::AuthorizationDenied { .. } => "authorization_denied",
            Self::PolicyViolation(_) => "policy_violation",
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineFailure>;
