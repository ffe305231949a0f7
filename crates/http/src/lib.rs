//! HTTP API server for inventory-chat.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(unreachable_pub, reason = "pub items are re-exported")]
#![allow(clippy::absolute_paths, reason = "Explicit paths for clarity")]
#![allow(unused_results, reason = "Some results are intentionally ignored")]
#![allow(missing_copy_implementations, reason = "Types may grow")]
#![allow(missing_debug_implementations, reason = "Internal types")]
#![allow(clippy::missing_docs_in_private_items, reason = "Internal crate")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::min_ident_chars, reason = "Short closure params are idiomatic")]
#![allow(clippy::shadow_reuse, reason = "Shadowing for Arc clones is idiomatic")]
#![allow(clippy::exhaustive_structs, reason = "HTTP types are stable")]
#![allow(clippy::single_call_fn, reason = "Helper functions improve readability")]

pub mod api_error;
mod auth;
mod handlers;
mod request_types;
mod response_types;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    routing::{delete, get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use inventory_chat_service::ChatService;

pub use request_types::{ConfirmRequest, SendMessageRequest};
pub use response_types::{CloseSessionResponse, InventoryResponse, VersionResponse};

/// Shared application state for all HTTP handlers.
pub struct AppState {
    /// Session registry and chat pipeline.
    pub chat: Arc<ChatService>,
}

impl AppState {
    #[must_use]
    pub const fn new(chat: Arc<ChatService>) -> Self {
        Self { chat }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/version", get(version))
        .route("/api/chat/sessions", post(handlers::chat::open_session))
        .route("/api/chat/sessions/{id}", delete(handlers::chat::close_session))
        .route(
            "/api/chat/sessions/{id}/messages",
            get(handlers::chat::get_messages).post(handlers::chat::send_message),
        )
        .route("/api/chat/sessions/{id}/confirm", post(handlers::chat::confirm_action))
        .route("/api/chat/sessions/{id}/cancel", post(handlers::chat::cancel_action))
        .route("/api/inventory", get(handlers::inventory::get_inventory))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Spawns the background task that closes sessions idle past the configured TTL.
///
/// Checks every `period`. A closed session abandons its in-flight completion.
pub fn start_session_sweeper(chat: Arc<ChatService>, period: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            let closed = chat.close_idle_sessions().await;
            if closed > 0 {
                let remaining = chat.session_count().await;
                tracing::debug!(closed, remaining, "Session sweep finished");
            }
        }
    });
}

async fn health() -> &'static str {
    "ok"
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse { version: env!("CARGO_PKG_VERSION") })
}
