use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub(crate) struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub response_format: ResponseFormat,
}

impl ChatRequest {
    /// Single user message asking for a JSON object back.
    pub(crate) fn json_prompt(model: &str, prompt: &str) -> Self {
        Self {
            model: model.to_owned(),
            messages: vec![Message { role: "user".to_owned(), content: prompt.to_owned() }],
            response_format: ResponseFormat { format_type: "json_object".to_owned() },
        }
    }
}

#[derive(Serialize)]
pub(crate) struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: String,
}

#[derive(Serialize)]
pub(crate) struct Message {
    pub role: String,
    pub content: String,
}

#[derive(Deserialize)]
pub(crate) struct ChatResponse {
    pub choices: Vec<Choice>,
}

#[derive(Deserialize)]
pub(crate) struct Choice {
    pub message: ResponseMessage,
}

#[derive(Deserialize)]
pub(crate) struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}
