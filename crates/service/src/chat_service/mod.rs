mod turn;


use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use inventory_chat_core::{
    ConversationMessage, ExecutionReport, InventoryItem, PendingAction, SchemaSnapshot,
    SessionToken, StatementPolicy, UserIdentity,
};
use inventory_chat_llm::CompletionService;
use inventory_chat_storage::PgStorage;
use inventory_chat_storage::traits::{
    ActionExecutor, HistoryStore, IdentityStore, InventoryStore, SchemaStore,
};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::chat_session::{ChatSession, SessionView};
use crate::config::ChatSettings;
use crate::error::ServiceError;

/// External collaborators of the chat pipeline.
#[derive(Clone)]
pub struct Collaborators {
    pub identity: Arc<dyn IdentityStore>,
    pub schema: Arc<dyn SchemaStore>,
    pub history: Arc<dyn HistoryStore>,
    pub executor: Arc<dyn ActionExecutor>,
    pub inventory: Arc<dyn InventoryStore>,
    pub completion: Arc<dyn CompletionService>,
}

impl Collaborators {
    /// Every storage collaborator backed by one PostgreSQL pool.
    #[must_use]
    pub fn postgres(storage: Arc<PgStorage>, completion: Arc<dyn CompletionService>) -> Self {
        Self {
            identity: storage.clone(),
            schema: storage.clone(),
            history: storage.clone(),
            executor: storage.clone(),
            inventory: storage,
            completion,
        }
    }
}

/// Result of one user interaction, always carrying the assistant message that
/// was appended to the conversation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TurnOutcome {
    /// No statement was produced; the exchange was recorded and the inventory reloaded.
    Answered {
        message: ConversationMessage,
        #[serde(skip_serializing_if = "Option::is_none")]
        inventory: Option<Vec<InventoryItem>>,
    },
    /// A policy-approved action waits for confirm or cancel.
    AwaitingConfirmation { message: ConversationMessage, action: PendingAction },
    /// The generated statement was refused by the policy.
    Rejected { message: ConversationMessage, reason: &'static str },
    /// The completion service could not produce a reply.
    Failed { message: ConversationMessage, reason: &'static str },
    Executed {
        message: ConversationMessage,
        report: ExecutionReport,
        #[serde(skip_serializing_if = "Option::is_none")]
        inventory: Option<Vec<InventoryItem>>,
    },
    ExecutionFailed { message: ConversationMessage },
    Cancelled { message: ConversationMessage },
}

impl TurnOutcome {
    #[must_use]
    pub const fn message(&self) -> &ConversationMessage {
        match self {
            Self::Answered { message, .. }
            | Self::AwaitingConfirmation { message, .. }
            | Self::Rejected { message, .. }
            | Self::Failed { message, .. }
            | Self::Executed { message, .. }
            | Self::ExecutionFailed { message }
            | Self::Cancelled { message } => message,
        }
    }
}

/// Session registry and pipeline orchestration.
pub struct ChatService {
    pub(crate) backends: Collaborators,
    pub(crate) policy: StatementPolicy,
    pub(crate) settings: ChatSettings,
    sessions: RwLock<HashMap<Uuid, Arc<ChatSession>>>,
}

impl ChatService {
    #[must_use]
    pub fn new(backends: Collaborators, settings: ChatSettings) -> Self {
        Self {
            backends,
            policy: StatementPolicy::new(settings.policy.clone()),
            settings,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    #[must_use]
    pub const fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    #[must_use]
    pub const fn policy(&self) -> &StatementPolicy {
        &self.policy
    }

    /// Resolves a bearer token to the calling user.
    pub async fn authenticate(&self, token: &SessionToken) -> Result<UserIdentity, ServiceError> {
        let identity =
            self.backends.identity.current_user(token).await?.ok_or(ServiceError::Unauthenticated)?;
        if identity.is_expired_at(Utc::now()) {
            return Err(ServiceError::Unauthenticated);
        }
        Ok(identity)
    }

    /// Opens a chat: greeting, then the user's history (oldest first), with a
    /// fresh schema snapshot. History and schema failures degrade to an empty
    /// transcript and a lazily fetched schema.
    pub async fn open_session(&self, identity: UserIdentity) -> SessionView {
        let mut messages = vec![ConversationMessage::greeting()];
        match self.backends.history.history(&identity.username, self.settings.history_limit).await {
            Ok(entries) => messages.extend(entries.into_iter().flat_map(|e| e.into_messages())),
            Err(e) => tracing::warn!(username = %identity.username, error = %e, "Failed to load chat history"),
        }

        let schema = match self.fetch_schema().await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch schema on session open");
                None
            },
        };

        let session = Arc::new(ChatSession::new(identity, messages, schema));
        self.sessions.write().await.insert(session.id(), Arc::clone(&session));
        tracing::info!(
            session_id = %session.id(),
            username = %session.identity().username,
            role = %session.identity().role,
            "Chat session opened"
        );
        session.view().await
    }

    pub async fn session_view(
        &self,
        session_id: Uuid,
        identity: &UserIdentity,
    ) -> Result<SessionView, ServiceError> {
        Ok(self.session(session_id, identity).await?.view().await)
    }

    /// Closes a session. An in-flight completion of that session is abandoned
    /// and its reply discarded.
    pub async fn close_session(
        &self,
        session_id: Uuid,
        identity: &UserIdentity,
    ) -> Result<(), ServiceError> {
        let session = self.session(session_id, identity).await?;
        self.sessions.write().await.remove(&session_id);
        session.close();
        tracing::info!(session_id = %session_id, username = %identity.username, "Chat session closed");
        Ok(())
    }

    /// Closes sessions idle for longer than the configured TTL. Busy sessions are skipped.
    pub async fn close_idle_sessions(&self) -> usize {
        let now = Utc::now();
        let ttl = self.settings.session_idle_ttl;
        let mut sessions = self.sessions.write().await;
        let idle: Vec<Uuid> = sessions
            .iter()
            .filter(|(_, s)| !s.is_busy() && s.idle_for(now) >= ttl)
            .map(|(id, _)| *id)
            .collect();
        for id in &idle {
            if let Some(session) = sessions.remove(id) {
                session.close();
            }
        }
        if !idle.is_empty() {
            tracing::info!(closed = idle.len(), "Closed idle chat sessions");
        }
        idle.len()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// The caller's current inventory view.
    pub async fn inventory(&self, identity: &UserIdentity) -> Result<Vec<InventoryItem>, ServiceError> {
        Ok(self.backends.inventory.inventory_for(&identity.username).await?)
    }

    /// Looks up an open session owned by `identity`. Sessions of other users
    /// are reported as not found.
    pub(crate) async fn session(
        &self,
        session_id: Uuid,
        identity: &UserIdentity,
    ) -> Result<Arc<ChatSession>, ServiceError> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&session_id)
            .filter(|s| s.identity().username == identity.username)
            .cloned()
            .ok_or(ServiceError::SessionNotFound(session_id))
    }

    pub(crate) async fn fetch_schema(&self) -> Result<SchemaSnapshot, ServiceError> {
        Ok(self.backends.schema.fetch_schema(&self.policy.config().protected_tables).await?)
    }
}

impl std::fmt::Debug for ChatService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatService")
            .field("policy", &self.policy)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
