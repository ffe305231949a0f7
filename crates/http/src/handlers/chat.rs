use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use uuid::Uuid;

use inventory_chat_service::{SessionView, TurnOutcome};

use crate::AppState;
use crate::api_error::ApiError;
use crate::auth::Caller;
use crate::request_types::{ConfirmRequest, SendMessageRequest};
use crate::response_types::CloseSessionResponse;

pub async fn open_session(
    State(state): State<Arc<AppState>>,
    Caller(identity): Caller,
) -> (StatusCode, Json<SessionView>) {
    let view = state.chat.open_session(identity).await;
    (StatusCode::CREATED, Json(view))
}

pub async fn get_messages(
    State(state): State<Arc<AppState>>,
    Caller(identity): Caller,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    Ok(Json(state.chat.session_view(id, &identity).await?))
}

pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Caller(identity): Caller,
    Path(id): Path<Uuid>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<TurnOutcome>, ApiError> {
    req.validate().map_err(ApiError::BadRequest)?;
    let outcome = state.chat.submit_message(id, &identity, &req.text).await?;
    Ok(Json(outcome))
}

pub async fn confirm_action(
    State(state): State<Arc<AppState>>,
    Caller(identity): Caller,
    Path(id): Path<Uuid>,
    Json(req): Json<ConfirmRequest>,
) -> Result<Json<TurnOutcome>, ApiError> {
    Ok(Json(state.chat.confirm(id, &identity, req.action_id).await?))
}

pub async fn cancel_action(
    State(state): State<Arc<AppState>>,
    Caller(identity): Caller,
    Path(id): Path<Uuid>,
) -> Result<Json<TurnOutcome>, ApiError> {
    Ok(Json(state.chat.cancel(id, &identity).await?))
}

pub async fn close_session(
    State(state): State<Arc<AppState>>,
    Caller(identity): Caller,
    Path(id): Path<Uuid>,
) -> Result<Json<CloseSessionResponse>, ApiError> {
    state.chat.close_session(id, &identity).await?;
    Ok(Json(CloseSessionResponse { closed: true, session_id: id }))
}
