//! Typed API error for HTTP handlers.
//!
//! Converts domain errors into HTTP responses with a JSON body and status code.
//! Handlers return `Result<Json<T>, ApiError>`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use inventory_chat_service::ServiceError;

/// API error with HTTP status code and human-readable message.
///
/// Converts to JSON response: `{"error": "message"}`.
///
/// `Internal` logs the real error server-side and returns a static message
/// to the client.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request: invalid input from caller.
    BadRequest(String),
    /// 401 Unauthorized: missing, unknown or expired session token.
    Unauthorized,
    /// 404 Not Found: no such session for this caller.
    NotFound(String),
    /// 409 Conflict: the session cannot take this request in its current state.
    Conflict(String),
    /// 410 Gone: the session was closed while the request ran.
    Gone(String),
    /// 500 Internal Server Error: unexpected failure. Details logged, not exposed.
    Internal(anyhow::Error),
}

impl ApiError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Gone(_) => StatusCode::GONE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::BadRequest(msg) | Self::NotFound(msg) | Self::Conflict(msg) | Self::Gone(msg) => {
                msg
            },
            Self::Unauthorized => "not authenticated".to_owned(),
            Self::Internal(err) => {
                tracing::error!(error = ?err, "internal server error");
                "internal server error".to_owned()
            },
        };
        let body = serde_json::json!({"error": message});
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unauthenticated => Self::Unauthorized,
            ServiceError::InvalidInput(msg) => Self::BadRequest(msg),
            ServiceError::SessionClosed => Self::Gone(err.to_string()),
            ref e if e.is_not_found() => Self::NotFound(err.to_string()),
            ref e if e.is_conflict() => Self::Conflict(err.to_string()),
            _ => Self::Internal(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inventory_chat_storage::StorageError;

    #[test]
    fn test_service_errors_map_to_status_codes() {
        let cases = [
            (ServiceError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (ServiceError::InvalidInput("empty".to_owned()), StatusCode::BAD_REQUEST),
            (ServiceError::SessionNotFound(uuid::Uuid::nil()), StatusCode::NOT_FOUND),
            (ServiceError::SessionClosed, StatusCode::GONE),
            (ServiceError::Busy, StatusCode::CONFLICT),
            (ServiceError::ConfirmationPending, StatusCode::CONFLICT),
            (ServiceError::NoPendingAction, StatusCode::CONFLICT),
            (ServiceError::StaleAction(uuid::Uuid::nil()), StatusCode::CONFLICT),
            (
                ServiceError::Storage(StorageError::Migration("boom".to_owned())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            let label = err.to_string();
            assert_eq!(ApiError::from(err).status(), status, "{label}");
        }
    }

    #[test]
    fn test_internal_error_hides_details() {
        let response =
            ApiError::from(anyhow::anyhow!("password=hunter2 connection refused")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
