//! Typed error enum for the LLM crate.

use std::time::Duration;

use inventory_chat_core::PipelineFailure;
use thiserror::Error;

/// Errors from completion API calls.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),
    #[error("completion request timed out after {0:?}")]
    Timeout(Duration),
    #[error("HTTP status {code}: {body}")]
    HttpStatus { code: u16, body: String },
    #[error("JSON parse error in {context}: {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("empty response: no choices returned")]
    EmptyResponse,
    #[error("client initialization failed: {0}")]
    ClientInit(String),
    #[error("all retries exhausted, last error: {0}")]
    RetriesExhausted(Box<LlmError>),
}

impl LlmError {
    /// Whether this error is transient and should be retried.
    ///
    /// Timeouts are not retried: the caller already waited the full budget.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::HttpRequest(_) => true,
            Self::HttpStatus { code, .. } => matches!(code, 429 | 500 | 502 | 503 | 529),
            _ => false,
        }
    }

    /// Pipeline-level classification of this error.
    #[must_use]
    pub fn failure(&self) -> PipelineFailure {
        match self {
            Self::Timeout(after) => PipelineFailure::Timeout(*after),
            Self::RetriesExhausted(last) => last.failure(),
            other => PipelineFailure::ServiceUnavailable(other.to_string()),
        }
    }
}
