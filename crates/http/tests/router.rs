//! Router-level tests against in-memory collaborators.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::{TimeDelta, Utc};
use http_body_util::BodyExt;
use inventory_chat_core::{
    ActionKind, ExecutionReport, GeneratedAction, HistoryEntry, InventoryItem, Role,
    SchemaSnapshot, SessionToken, UserIdentity,
};
use inventory_chat_http::{AppState, create_router};
use inventory_chat_llm::{CompletionService, LlmError};
use inventory_chat_service::{ChatService, ChatSettings, Collaborators};
use inventory_chat_storage::StorageError;
use inventory_chat_storage::traits::{
    ActionExecutor, HistoryStore, IdentityStore, InventoryStore, SchemaStore,
};
use serde_json::{Value, json};
use tower::ServiceExt;

const ADMIN_TOKEN: &str = "admin-token";
const MEMBER_TOKEN: &str = "member-token";

struct Backend {
    executed: Mutex<usize>,
}

#[async_trait]
impl IdentityStore for Backend {
    async fn current_user(
        &self,
        token: &SessionToken,
    ) -> Result<Option<UserIdentity>, StorageError> {
        let (username, role) = match token.expose() {
            ADMIN_TOKEN => ("sari", Role::Admin),
            MEMBER_TOKEN => ("budi", Role::Member),
            _ => return Ok(None),
        };
        let now = Utc::now();
        Ok(Some(UserIdentity {
            username: username.to_owned(),
            role,
            session_token: token.clone(),
            issued_at: now,
            expires_at: now + TimeDelta::hours(1),
        }))
    }
}

#[async_trait]
impl SchemaStore for Backend {
    async fn fetch_schema(&self, _exclude: &[String]) -> Result<SchemaSnapshot, StorageError> {
        Ok(SchemaSnapshot::new(Vec::new(), Utc::now()))
    }
}

#[async_trait]
impl HistoryStore for Backend {
    async fn history(&self, _username: &str, _limit: i64) -> Result<Vec<HistoryEntry>, StorageError> {
        Ok(Vec::new())
    }

    async fn append_history(
        &self,
        _username: &str,
        _action: ActionKind,
        _entry: &HistoryEntry,
    ) -> Result<(), StorageError> {
        Ok(())
    }
}

#[async_trait]
impl ActionExecutor for Backend {
    async fn execute(&self, _action: &GeneratedAction) -> Result<ExecutionReport, StorageError> {
        *self.executed.lock().unwrap() += 1;
        Ok(ExecutionReport { results: Vec::new(), executed_at: Utc::now() })
    }
}

#[async_trait]
impl InventoryStore for Backend {
    async fn inventory_for(&self, _username: &str) -> Result<Vec<InventoryItem>, StorageError> {
        Ok(Vec::new())
    }
}

struct FixedReply(&'static str);

#[async_trait]
impl CompletionService for FixedReply {
    async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
        Ok(self.0.to_owned())
    }
}

fn app(reply: &'static str) -> axum::Router {
    let backend = Arc::new(Backend { executed: Mutex::new(0) });
    let backends = Collaborators {
        identity: backend.clone(),
        schema: backend.clone(),
        history: backend.clone(),
        executor: backend.clone(),
        inventory: backend,
        completion: Arc::new(FixedReply(reply)),
    };
    let chat = Arc::new(ChatService::new(backends, ChatSettings::default()));
    create_router(Arc::new(AppState::new(chat)))
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &axum::Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn open(app: &axum::Router, token: &str) -> String {
    let (status, body) = send(app, request("POST", "/api/chat/sessions", Some(token), None)).await;
    assert_eq!(status, StatusCode::CREATED);
    body["session_id"].as_str().unwrap().to_owned()
}

#[tokio::test]
async fn test_health_needs_no_token() {
    let app = app("{}");
    let response = app.oneshot(request("GET", "/health", None, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_chat_routes_require_bearer_token() {
    let app = app("{}");
    let (status, body) = send(&app, request("POST", "/api/chat/sessions", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "not authenticated");

    let (status, _) =
        send(&app, request("GET", "/api/inventory", Some("unknown"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_open_session_starts_with_greeting() {
    let app = app("{}");
    let (status, body) =
        send(&app, request("POST", "/api/chat/sessions", Some(MEMBER_TOKEN), None)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["state"], "idle");
    assert_eq!(body["messages"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_insert_waits_for_confirm_then_executes() {
    let app = app(
        r#"{"explain": "Menambah barang.", "sql_script": "INSERT INTO inventory (name, quantity) VALUES ('a', 1)"}"#,
    );
    let id = open(&app, ADMIN_TOKEN).await;
    let uri = format!("/api/chat/sessions/{id}/messages");

    let (status, body) =
        send(&app, request("POST", &uri, Some(ADMIN_TOKEN), Some(json!({"text": "tambah"})))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "awaiting_confirmation");
    let action_id = body["action"]["id"].as_str().unwrap().to_owned();

    let (status, _) =
        send(&app, request("POST", &uri, Some(ADMIN_TOKEN), Some(json!({"text": "lagi"})))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let confirm = format!("/api/chat/sessions/{id}/confirm");
    let (status, body) = send(
        &app,
        request("POST", &confirm, Some(ADMIN_TOKEN), Some(json!({"action_id": action_id}))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "executed");
}

#[tokio::test]
async fn test_member_insert_is_rejected_inline() {
    let app = app(
        r#"{"explain": "Menambah barang.", "sql_script": "INSERT INTO inventory (name) VALUES ('a')"}"#,
    );
    let id = open(&app, MEMBER_TOKEN).await;
    let uri = format!("/api/chat/sessions/{id}/messages");

    let (status, body) =
        send(&app, request("POST", &uri, Some(MEMBER_TOKEN), Some(json!({"text": "tambah"})))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "rejected");
    assert_eq!(body["reason"], "authorization_denied");
}

#[tokio::test]
async fn test_blank_message_is_bad_request() {
    let app = app("{}");
    let id = open(&app, MEMBER_TOKEN).await;
    let uri = format!("/api/chat/sessions/{id}/messages");
    let (status, _) =
        send(&app, request("POST", &uri, Some(MEMBER_TOKEN), Some(json!({"text": " "})))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_other_users_cannot_see_or_close_a_session() {
    let app = app("{}");
    let id = open(&app, ADMIN_TOKEN).await;
    let uri = format!("/api/chat/sessions/{id}");

    let (status, _) =
        send(&app, request("GET", &format!("{uri}/messages"), Some(MEMBER_TOKEN), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, request("DELETE", &uri, Some(MEMBER_TOKEN), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, request("DELETE", &uri, Some(ADMIN_TOKEN), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["closed"], true);
}

#[tokio::test]
async fn test_cancel_without_pending_action_conflicts() {
    let app = app("{}");
    let id = open(&app, ADMIN_TOKEN).await;
    let uri = format!("/api/chat/sessions/{id}/cancel");
    let (status, _) = send(&app, request("POST", &uri, Some(ADMIN_TOKEN), None)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}
