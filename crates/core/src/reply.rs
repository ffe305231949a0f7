use serde::{Deserialize, Serialize};

use crate::constants::FALLBACK_EXPLAIN;
use crate::error::{PipelineFailure, PipelineResult};
use crate::json_utils::strip_markdown_json;

/// The structured answer the model is asked to return.
///
/// Missing keys deserialize to an empty explanation and no statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelReply {
    #[serde(default)]
    pub explain: String,
    #[serde(default)]
    pub sql_script: Option<String>,
}

impl ModelReply {
    /// Reply used whenever the model output cannot be parsed.
    #[must_use]
    pub fn fallback() -> Self {
        Self { explain: FALLBACK_EXPLAIN.to_owned(), sql_script: None }
    }

    /// Generated script, if any. Blank scripts count as no script.
    #[must_use]
    pub fn statement(&self) -> Option<&str> {
        self.sql_script.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Parses raw model output, tolerating code-fence wrappers.
///
/// # Errors
/// Returns [`PipelineFailure::MalformedModelOutput`] if the cleaned text is not
/// a JSON object of the expected shape.
pub fn parse_model_reply(raw: &str) -> PipelineResult<ModelReply> {
    let cleaned = strip_markdown_json(raw);
    serde_json::from_str(cleaned).map_err(|e| PipelineFailure::MalformedModelOutput(e.to_string()))
}

/// Like [`parse_model_reply`], but degrades to [`ModelReply::fallback`].
#[must_use]
pub fn parse_model_reply_or_fallback(raw: &str) -> ModelReply {
    match parse_model_reply(raw) {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!(error = %e, raw_len = raw.len(), "Model reply unparseable, using fallback");
            ModelReply::fallback()
        },
    }
}
