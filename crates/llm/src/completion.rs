use async_trait::async_trait;

use crate::ai_types::ChatRequest;
use crate::client::LlmClient;
use crate::error::LlmError;

/// Sends one prompt and returns the model's raw text.
///
/// Implementations do not interpret the text; structure is enforced by the
/// prompt and by the reply parser.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

#[async_trait]
impl CompletionService for LlmClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let request = ChatRequest::json_prompt(&self.model, prompt);
        let started = std::time::Instant::now();
        let result = self.chat_completion(&request).await;
        match &result {
            Ok(text) => tracing::debug!(
                model = %self.model,
                elapsed_ms = started.elapsed().as_millis(),
                response_len = text.len(),
                "completion received"
            ),
            Err(e) => tracing::warn!(model = %self.model, error = %e, "completion failed"),
        }
        result
    }
}
