//! Typed error enum for the service layer.
//!
//! Wraps storage failures together with the session-level refusals of the
//! chat flow, so handlers can match on specific failure modes.
//!
//! Pipeline failures (unavailable model, denied statement, ...) are not errors
//! here: they become assistant messages inside a
//! [`TurnOutcome`](crate::TurnOutcome).

use inventory_chat_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage operation failed (DB, not found, duplicate, etc.).
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// Session token unknown or expired.
    #[error("not authenticated")]
    Unauthenticated,

    /// No open session with this id belongs to the caller.
    #[error("session not found: {0}")]
    SessionNotFound(uuid::Uuid),

    /// The session was closed while the request was in flight.
    #[error("session closed")]
    SessionClosed,

    /// Another request of the same session is still running.
    #[error("session is busy with another request")]
    Busy,

    /// A generated action awaits confirm or cancel.
    #[error("an action is awaiting confirmation")]
    ConfirmationPending,

    #[error("no action is awaiting confirmation")]
    NoPendingAction,

    /// Confirm referenced an action other than the pending one.
    #[error("action {0} is not the pending action")]
    StaleAction(uuid::Uuid),

    /// Caller provided invalid input (empty text, malformed data).
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ServiceError {
    /// Whether this error represents a not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SessionNotFound(_) | Self::Storage(StorageError::NotFound { .. }))
    }

    /// Whether the request conflicts with the session's current state.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::Busy | Self::ConfirmationPending | Self::NoPendingAction | Self::StaleAction(_)
        ) || matches!(self, Self::Storage(e) if e.is_duplicate())
    }
}
