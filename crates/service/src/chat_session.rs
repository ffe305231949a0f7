//! Per-session chat context.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use inventory_chat_core::{ConversationMessage, PendingAction, SchemaSnapshot, UserIdentity};
use serde::Serialize;
use tokio::sync::{Mutex, watch};
use uuid::Uuid;

use crate::error::ServiceError;

/// Confirmation state of a session.
#[derive(Debug, Clone)]
pub enum FlowState {
    Idle,
    AwaitingConfirmation(PendingAction),
    Executing,
    /// Last execution failed. Accepts new input like `Idle`.
    Failed,
}

impl FlowState {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AwaitingConfirmation(_) => "awaiting_confirmation",
            Self::Executing => "executing",
            Self::Failed => "failed",
        }
    }

    #[must_use]
    pub const fn pending(&self) -> Option<&PendingAction> {
        match self {
            Self::AwaitingConfirmation(action) => Some(action),
            _ => None,
        }
    }
}

/// Client-facing snapshot of a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub username: String,
    pub state: &'static str,
    pub messages: Vec<ConversationMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_action: Option<PendingAction>,
}

/// Conversation, schema snapshot and confirmation state of one open chat.
///
/// Created by [`crate::ChatService::open_session`], torn down by
/// `close_session` or the idle sweeper. Closing wakes every task waiting in
/// [`ChatSession::closed`].
pub struct ChatSession {
    id: Uuid,
    identity: UserIdentity,
    pub(crate) messages: Mutex<Vec<ConversationMessage>>,
    pub(crate) state: Mutex<FlowState>,
    pub(crate) schema: Mutex<Option<SchemaSnapshot>>,
    busy: AtomicBool,
    closed: watch::Sender<bool>,
    last_active_ms: AtomicI64,
}

/// Marks the session busy until dropped.
pub(crate) struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl ChatSession {
    pub(crate) fn new(
        identity: UserIdentity,
        messages: Vec<ConversationMessage>,
        schema: Option<SchemaSnapshot>,
    ) -> Self {
        let (closed, _) = watch::channel(false);
        Self {
            id: Uuid::new_v4(),
            identity,
            messages: Mutex::new(messages),
            state: Mutex::new(FlowState::Idle),
            schema: Mutex::new(schema),
            busy: AtomicBool::new(false),
            closed,
            last_active_ms: AtomicI64::new(Utc::now().timestamp_millis()),
        }
    }

    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub const fn identity(&self) -> &UserIdentity {
        &self.identity
    }

    /// Claims the session for one request. `None` if another request holds it.
    pub(crate) fn try_begin(&self) -> Option<BusyGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard { flag: &self.busy })
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    pub(crate) fn ensure_open(&self) -> Result<(), ServiceError> {
        if self.is_closed() { Err(ServiceError::SessionClosed) } else { Ok(()) }
    }

    pub(crate) fn close(&self) {
        self.closed.send_replace(true);
    }

    /// Resolves once the session is closed.
    pub async fn closed(&self) {
        let mut rx = self.closed.subscribe();
        let _ = rx.wait_for(|closed| *closed).await;
    }

    pub(crate) fn touch(&self) {
        self.last_active_ms.store(Utc::now().timestamp_millis(), Ordering::Release);
    }

    #[must_use]
    pub fn idle_for(&self, now: DateTime<Utc>) -> Duration {
        let last = self.last_active_ms.load(Ordering::Acquire);
        let elapsed = now.timestamp_millis().saturating_sub(last);
        Duration::from_millis(u64::try_from(elapsed).unwrap_or(0))
    }

    pub(crate) async fn push(&self, message: ConversationMessage) {
        self.messages.lock().await.push(message);
    }

    pub(crate) async fn set_state(&self, state: FlowState) {
        *self.state.lock().await = state;
    }

    pub async fn messages(&self) -> Vec<ConversationMessage> {
        self.messages.lock().await.clone()
    }

    pub async fn view(&self) -> SessionView {
        let state = self.state.lock().await;
        SessionView {
            session_id: self.id,
            username: self.identity.username.clone(),
            state: state.name(),
            messages: self.messages().await,
            pending_action: state.pending().cloned(),
        }
    }
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("id", &self.id)
            .field("username", &self.identity.username)
            .field("busy", &self.is_busy())
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}
