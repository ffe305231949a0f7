//! Bearer-token authentication for chat routes.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use inventory_chat_core::{SessionToken, UserIdentity};

use crate::AppState;
use crate::api_error::ApiError;

/// The authenticated caller of a request.
pub struct Caller(pub UserIdentity);

impl FromRequestParts<Arc<AppState>> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts.headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
        let token = header.and_then(bearer_token).ok_or(ApiError::Unauthorized)?;
        let identity = state.chat.authenticate(&token).await?;
        Ok(Self(identity))
    }
}

fn bearer_token(header: &str) -> Option<SessionToken> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| SessionToken::new(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_bearer_header() {
        let token = bearer_token("Bearer abc123").map(|t| t.expose().to_owned());
        assert_eq!(token.as_deref(), Some("abc123"));
        let token = bearer_token("bearer   xyz ").map(|t| t.expose().to_owned());
        assert_eq!(token.as_deref(), Some("xyz"));
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert!(bearer_token("Basic dXNlcjpwYXNz").is_none());
        assert!(bearer_token("Bearer ").is_none());
        assert!(bearer_token("abc123").is_none());
    }
}
