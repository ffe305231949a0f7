use std::time::Duration;

use inventory_chat_core::constants::DEFAULT_LLM_TIMEOUT_SECS;
use inventory_chat_core::env_parse_with_default;

use crate::ai_types::{ChatRequest, ChatResponse};
use crate::error::LlmError;

/// Default OpenAI-compatible endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
/// Default LLM model to use.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const RETRY_DELAYS: [u64; 4] = [0, 1, 2, 4];

/// Connection settings for the completion service.
#[derive(Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    /// Extra attempts for transient failures. Zero means exactly one call.
    pub max_retries: usize,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl LlmConfig {
    #[must_use]
    pub fn new(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url,
            model: DEFAULT_MODEL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_LLM_TIMEOUT_SECS),
            max_retries: 0,
        }
    }

    /// Reads `INVENTORY_CHAT_*` variables.
    ///
    /// # Errors
    /// Returns [`LlmError::ClientInit`] if `INVENTORY_CHAT_API_KEY` is not set.
    pub fn from_env() -> Result<Self, LlmError> {
        let api_key = std::env::var("INVENTORY_CHAT_API_KEY")
            .map_err(|_| LlmError::ClientInit("INVENTORY_CHAT_API_KEY must be set".to_owned()))?;
        let base_url = std::env::var("INVENTORY_CHAT_API_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());
        let model =
            std::env::var("INVENTORY_CHAT_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_owned());
        let timeout_secs =
            env_parse_with_default("INVENTORY_CHAT_LLM_TIMEOUT_SECS", DEFAULT_LLM_TIMEOUT_SECS);
        Ok(Self {
            api_key,
            base_url,
            model,
            timeout: Duration::from_secs(timeout_secs.max(1)),
            max_retries: env_parse_with_default("INVENTORY_CHAT_LLM_MAX_RETRIES", 0),
        })
    }

    #[must_use]
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }
}

/// Client for LLM API calls.
pub struct LlmClient {
    pub(crate) client: reqwest::Client,
    pub(crate) api_key: String,
    pub(crate) base_url: String,
    pub(crate) model: String,
    pub(crate) timeout: Duration,
    pub(crate) max_retries: usize,
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("client", &self.client)
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl LlmClient {
    /// Creates a new LLM client from the given settings.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let base_url = config.base_url.trim_end_matches('/').to_owned();
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::ClientInit(e.to_string()))?;
        Ok(Self {
            client,
            api_key: config.api_key,
            base_url,
            model: config.model,
            timeout: config.timeout,
            max_retries: config.max_retries,
        })
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    fn request_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() { LlmError::Timeout(self.timeout) } else { LlmError::HttpRequest(e) }
    }

    /// Send a chat completion request and return the extracted content string.
    ///
    /// Makes one attempt plus up to `max_retries` more for transient failures.
    ///
    /// # Errors
    /// Returns an error if the HTTP request fails or times out, the API returns
    /// a non-success status, the response body cannot be parsed, or the
    /// choices array is empty.
    pub(crate) async fn chat_completion(&self, request: &ChatRequest) -> Result<String, LlmError> {
        let mut attempt: usize = 0;
        loop {
            match self.attempt(request).await {
                Ok(content) => return Ok(content),
                Err(err) if err.is_transient() && attempt < self.max_retries => {
                    attempt = attempt.saturating_add(1);
                    let delay_secs = RETRY_DELAYS.get(attempt).copied().unwrap_or(4);
                    let delay = Duration::from_secs(delay_secs);
                    tracing::warn!(
                        error = %err,
                        "LLM retry attempt {attempt}/{} after {delay:?}",
                        self.max_retries
                    );
                    tokio::time::sleep(delay).await;
                },
                Err(err) if attempt > 0 => return Err(LlmError::RetriesExhausted(Box::new(err))),
                Err(err) => return Err(err),
            }
        }
    }

    async fn attempt(&self, request: &ChatRequest) -> Result<String, LlmError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(request)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body =
                response.text().await.unwrap_or_else(|_| "Could not read error body".to_owned());
            return Err(LlmError::HttpStatus {
                code: status.as_u16(),
                body: truncate(&body, 500).to_owned(),
            });
        }

        let body = response.text().await.map_err(|e| self.request_error(e))?;
        let chat_response: ChatResponse =
            serde_json::from_str(&body).map_err(|e| LlmError::JsonParse {
                context: format!("chat completion response (body: {})", truncate(&body, 200)),
                source: e,
            })?;

        let first_choice = chat_response.choices.into_iter().next().ok_or(LlmError::EmptyResponse)?;
        first_choice.message.content.ok_or(LlmError::EmptyResponse)
    }
}

/// Truncates a string to the given maximum length at a char boundary.
#[must_use]
pub fn truncate(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        s
    } else {
        let mut end = max_len;
        while end > 0 && !s.is_char_boundary(end) {
            end = end.saturating_sub(1);
        }
        s.get(..end).unwrap_or("")
    }
}
