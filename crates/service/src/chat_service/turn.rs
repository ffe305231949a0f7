//! One pass through the pipeline: prompt, completion, parse, policy, and the
//! confirmation state machine around execution.

use chrono::Utc;
use inventory_chat_core::constants::{CANCELLED_REPLY, EXECUTION_DONE_REPLY, EXECUTION_FAILED_REPLY};
use inventory_chat_core::{
    ActionKind, ConversationMessage, GeneratedAction, HistoryEntry, InventoryItem, PendingAction,
    PipelineFailure, PromptInput, UserIdentity, build_prompt, parse_model_reply_or_fallback,
};
use uuid::Uuid;

use super::{ChatService, TurnOutcome};
use crate::chat_session::{ChatSession, FlowState};
use crate::error::ServiceError;

impl ChatService {
    /// Sends one user message through the pipeline.
    ///
    /// Pipeline failures never surface as errors: they end the turn with a
    /// neutral assistant message. Errors are reserved for requests the session
    /// cannot accept right now.
    pub async fn submit_message(
        &self,
        session_id: Uuid,
        identity: &UserIdentity,
        text: &str,
    ) -> Result<TurnOutcome, ServiceError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ServiceError::InvalidInput("message must not be empty".to_owned()));
        }
        let session = self.session(session_id, identity).await?;
        let _busy = session.try_begin().ok_or(ServiceError::Busy)?;
        session.ensure_open()?;
        match *session.state.lock().await {
            FlowState::AwaitingConfirmation(_) => return Err(ServiceError::ConfirmationPending),
            FlowState::Executing => return Err(ServiceError::Busy),
            FlowState::Idle | FlowState::Failed => {},
        }
        session.touch();
        session.push(ConversationMessage::user(text)).await;

        let schema_json = match self.schema_json(&session).await {
            Ok(json) => json,
            Err(failure) => return Ok(self.fail_turn(&session, &failure).await),
        };
        let prompt = build_prompt(&PromptInput {
            username: &session.identity().username,
            role: session.identity().role,
            message: text,
            schema_json: &schema_json,
            max_values_per_statement: self.policy.config().max_values_per_statement,
        });

        let completion = tokio::select! {
            result = self.backends.completion.complete(&prompt) => result,
            () = session.closed() => {
                tracing::info!(session_id = %session_id, "Session closed during completion, request abandoned");
                return Err(ServiceError::SessionClosed);
            }
        };
        if session.is_closed() {
            tracing::info!(session_id = %session_id, "Discarding completion for closed session");
            return Err(ServiceError::SessionClosed);
        }
        let raw = match completion {
            Ok(raw) => raw,
            Err(e) => return Ok(self.fail_turn(&session, &e.failure()).await),
        };

        let reply = parse_model_reply_or_fallback(&raw);
        let Some(script) = reply.statement().map(str::to_owned) else {
            return Ok(self.answer_without_statement(&session, text, reply.explain).await);
        };

        match self.policy.evaluate(session.identity(), &script) {
            Err(failure) => Ok(self.reject_turn(&session, text, &failure).await),
            Ok(statements) if statements.is_empty() => {
                Ok(self.answer_without_statement(&session, text, reply.explain).await)
            },
            Ok(statements) => {
                let action = PendingAction::new(
                    text,
                    reply.explain.clone(),
                    Some(script),
                    statements,
                    session.identity().session_token.clone(),
                );
                let message = ConversationMessage::assistant(reply.explain);
                session.push(message.clone()).await;
                tracing::info!(
                    session_id = %session_id,
                    action_id = %action.id,
                    statements = action.statements.len(),
                    "Action awaiting confirmation"
                );
                session.set_state(FlowState::AwaitingConfirmation(action.clone())).await;
                Ok(TurnOutcome::AwaitingConfirmation { message, action })
            },
        }
    }

    /// Executes the pending action. `action_id` must name the action the
    /// client was shown.
    pub async fn confirm(
        &self,
        session_id: Uuid,
        identity: &UserIdentity,
        action_id: Uuid,
    ) -> Result<TurnOutcome, ServiceError> {
        let session = self.session(session_id, identity).await?;
        let _busy = session.try_begin().ok_or(ServiceError::Busy)?;
        session.ensure_open()?;
        session.touch();

        let action = {
            let mut state = session.state.lock().await;
            let pending_id = state.pending().map(|a| a.id).ok_or(ServiceError::NoPendingAction)?;
            if pending_id != action_id {
                return Err(ServiceError::StaleAction(action_id));
            }
            let FlowState::AwaitingConfirmation(action) =
                std::mem::replace(&mut *state, FlowState::Executing)
            else {
                return Err(ServiceError::NoPendingAction);
            };
            action
        };

        if let Err(failure) = self.policy.authorize(session.identity(), &action.statements) {
            return Ok(self.reject_turn(&session, &action.request, &failure).await);
        }

        let request = action.request.clone();
        let sql_script = action.statement.clone();
        let generated = action.into_generated(session.identity());
        match self.backends.executor.execute(&generated).await {
            Ok(report) => {
                tracing::info!(
                    session_id = %session_id,
                    action_id = %action_id,
                    rows_affected = report.rows_affected(),
                    "Confirmed action executed"
                );
                let message = ConversationMessage::assistant(EXECUTION_DONE_REPLY);
                session.push(message.clone()).await;
                session.set_state(FlowState::Idle).await;
                let inventory = self.refresh_inventory(&session).await;
                Ok(TurnOutcome::Executed { message, report, inventory })
            },
            Err(e) => {
                tracing::error!(
                    session_id = %session_id,
                    action_id = %action_id,
                    error = %e,
                    "Confirmed action failed"
                );
                let message = ConversationMessage::assistant(EXECUTION_FAILED_REPLY);
                session.push(message.clone()).await;
                session.set_state(FlowState::Failed).await;
                self.record(&session, &request, EXECUTION_FAILED_REPLY, sql_script).await;
                Ok(TurnOutcome::ExecutionFailed { message })
            },
        }
    }

    /// Discards the pending action without running it.
    pub async fn cancel(
        &self,
        session_id: Uuid,
        identity: &UserIdentity,
    ) -> Result<TurnOutcome, ServiceError> {
        let session = self.session(session_id, identity).await?;
        session.ensure_open()?;
        session.touch();
        {
            let mut state = session.state.lock().await;
            let action_id = state.pending().map(|a| a.id).ok_or(ServiceError::NoPendingAction)?;
            *state = FlowState::Idle;
            tracing::info!(session_id = %session_id, action_id = %action_id, "Pending action cancelled");
        }
        let message = ConversationMessage::assistant(CANCELLED_REPLY);
        session.push(message.clone()).await;
        Ok(TurnOutcome::Cancelled { message })
    }

    /// Schema JSON for the prompt, re-fetched when the cached snapshot is
    /// missing or older than the TTL. A failed refresh falls back to the
    /// previous snapshot when there is one.
    async fn schema_json(&self, session: &ChatSession) -> Result<String, PipelineFailure> {
        let mut cached = session.schema.lock().await;
        let fresh = cached.as_ref().is_some_and(|s| !s.is_stale(Utc::now(), self.settings.schema_ttl));
        if !fresh {
            match self.fetch_schema().await {
                Ok(snapshot) => *cached = Some(snapshot),
                Err(e) if cached.is_some() => {
                    tracing::warn!(error = %e, "Schema refresh failed, using previous snapshot");
                },
                Err(e) => return Err(PipelineFailure::ServiceUnavailable(e.to_string())),
            }
        }
        let snapshot = cached
            .as_ref()
            .ok_or_else(|| PipelineFailure::ServiceUnavailable("no schema snapshot".to_owned()))?;
        snapshot.to_prompt_json().map_err(|e| PipelineFailure::ServiceUnavailable(e.to_string()))
    }

    async fn fail_turn(&self, session: &ChatSession, failure: &PipelineFailure) -> TurnOutcome {
        tracing::warn!(
            session_id = %session.id(),
            kind = failure.kind(),
            error = %failure,
            "Chat turn failed"
        );
        let message = ConversationMessage::assistant(failure.user_message());
        session.push(message.clone()).await;
        session.set_state(FlowState::Idle).await;
        TurnOutcome::Failed { message, reason: failure.kind() }
    }

    async fn reject_turn(
        &self,
        session: &ChatSession,
        request: &str,
        failure: &PipelineFailure,
    ) -> TurnOutcome {
        tracing::warn!(
            session_id = %session.id(),
            username = %session.identity().username,
            kind = failure.kind(),
            error = %failure,
            "Generated statement refused"
        );
        let message = ConversationMessage::assistant(failure.user_message());
        session.push(message.clone()).await;
        session.set_state(FlowState::Idle).await;
        self.record(session, request, failure.user_message(), None).await;
        TurnOutcome::Rejected { message, reason: failure.kind() }
    }

    /// Null-statement path: no confirmation, the exchange is recorded right
    /// away and the inventory reloaded.
    async fn answer_without_statement(
        &self,
        session: &ChatSession,
        request: &str,
        explain: String,
    ) -> TurnOutcome {
        let message = ConversationMessage::assistant(explain);
        session.push(message.clone()).await;
        session.set_state(FlowState::Executing).await;

        let action = GeneratedAction::record_only(
            session.identity().username.clone(),
            request,
            message.content.clone(),
            session.identity().session_token.clone(),
        );
        match self.backends.executor.execute(&action).await {
            Ok(_) => {
                session.set_state(FlowState::Idle).await;
                let inventory = self.refresh_inventory(session).await;
                TurnOutcome::Answered { message, inventory }
            },
            Err(e) => {
                tracing::error!(session_id = %session.id(), error = %e, "Failed to record chat turn");
                let failed = ConversationMessage::assistant(EXECUTION_FAILED_REPLY);
                session.push(failed.clone()).await;
                session.set_state(FlowState::Failed).await;
                TurnOutcome::ExecutionFailed { message: failed }
            },
        }
    }

    async fn refresh_inventory(&self, session: &ChatSession) -> Option<Vec<InventoryItem>> {
        match self.backends.inventory.inventory_for(&session.identity().username).await {
            Ok(items) => Some(items),
            Err(e) => {
                tracing::warn!(session_id = %session.id(), error = %e, "Inventory refresh failed");
                None
            },
        }
    }

    /// Best-effort history entry for turns that never reach the executor.
    async fn record(
        &self,
        session: &ChatSession,
        request: &str,
        response: &str,
        sql_script: Option<String>,
    ) {
        let entry = HistoryEntry {
            request: request.to_owned(),
            response: response.to_owned(),
            sql_script,
            created_at: Utc::now(),
        };
        if let Err(e) = self
            .backends
            .history
            .append_history(&session.identity().username, ActionKind::AskAi, &entry)
            .await
        {
            tracing::warn!(session_id = %session.id(), error = %e, "Failed to record chat history");
        }
    }
}
