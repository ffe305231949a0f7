use std::time::Duration;

use inventory_chat_core::PipelineFailure;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::client::{LlmClient, LlmConfig};
use crate::completion::CompletionService;
use crate::error::LlmError;

fn client_for(server: &MockServer, max_retries: usize) -> LlmClient {
    let config = LlmConfig::new("test-key".to_owned(), server.uri())
        .with_model("test-model".to_owned())
        .with_timeout(Duration::from_secs(5))
        .with_max_retries(max_retries);
    LlmClient::new(config).unwrap()
}

fn completion_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [{
            "message": {
                "content": content,
                "role": "assistant"
            }
        }]
    })
}

#[tokio::test]
async fn test_success_on_first_attempt() {
    let server = MockServer::start().await;
    let client = client_for(&server, 0);

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .and(body_partial_json(serde_json::json!({
            "model": "test-model",
            "response_format": {"type": "json_object"},
            "messages": [{"role": "user", "content": "hello"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("test response")))
        .expect(1)
        .mount(&server)
        .await;

    let result = client.complete("hello").await.unwrap();
    assert_eq!(result, "test response");
}

#[tokio::test]
async fn test_no_retry_by_default() {
    let server = MockServer::start().await;
    let client = client_for(&server, 0);

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client.complete("hello").await.unwrap_err();
    assert!(matches!(err, LlmError::HttpStatus { code: 503, .. }));
    assert_eq!(err.failure().kind(), "service_unavailable");
}

#[tokio::test]
async fn test_retry_on_429_then_success() {
    let server = MockServer::start().await;
    let client = client_for(&server, 2);

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("success after retry")))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Rate limit exceeded"))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let result = client.complete("hello").await.unwrap();
    assert_eq!(result, "success after retry");
}

#[tokio::test]
async fn test_no_retry_on_400() {
    let server = MockServer::start().await;
    let client = client_for(&server, 3);

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Bad Request"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client.complete("hello").await.unwrap_err();
    assert!(matches!(err, LlmError::HttpStatus { code: 400, .. }));
}

#[tokio::test]
async fn test_retries_exhausted() {
    let server = MockServer::start().await;
    let client = client_for(&server, 1);

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .expect(2)
        .mount(&server)
        .await;

    let err = client.complete("hello").await.unwrap_err();
    assert!(matches!(err, LlmError::RetriesExhausted(_)));
    assert_eq!(err.failure().kind(), "service_unavailable");
}

#[tokio::test]
async fn test_timeout_is_reported_distinctly() {
    let server = MockServer::start().await;
    let config = LlmConfig::new("test-key".to_owned(), server.uri())
        .with_timeout(Duration::from_millis(100));
    let client = LlmClient::new(config).unwrap();

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body("too late"))
                .set_delay(Duration::from_millis(1000)),
        )
        .mount(&server)
        .await;

    let err = client.complete("hello").await.unwrap_err();
    assert!(matches!(err, LlmError::Timeout(_)));
    assert_eq!(err.failure(), PipelineFailure::Timeout(Duration::from_millis(100)));
}

#[tokio::test]
async fn test_empty_choices() {
    let server = MockServer::start().await;
    let client = client_for(&server, 0);

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
        .mount(&server)
        .await;

    let err = client.complete("hello").await.unwrap_err();
    assert!(matches!(err, LlmError::EmptyResponse));
}

#[tokio::test]
async fn test_content_is_returned_unparsed() {
    let server = MockServer::start().await;
    let client = client_for(&server, 0);

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("```json\n{}\n```")))
        .mount(&server)
        .await;

    assert_eq!(client.complete("hello").await.unwrap(), "```json\n{}\n```");
}

#[tokio::test]
async fn test_unreachable_host_is_service_unavailable() {
    let config = LlmConfig::new("test-key".to_owned(), "http://127.0.0.1:1".to_owned())
        .with_timeout(Duration::from_secs(2));
    let client = LlmClient::new(config).unwrap();

    let err = client.complete("hello").await.unwrap_err();
    assert_eq!(err.failure().kind(), "service_unavailable");
}
