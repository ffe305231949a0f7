use std::time::Duration;

use inventory_chat_core::PipelineFailure;

use crate::client::{LlmClient, LlmConfig, truncate};
use crate::error::LlmError;

#[test]
fn test_truncate_within_limit() {
    assert_eq!(truncate("hello", 10), "hello");
}

#[test]
fn test_truncate_exceeds_limit() {
    assert_eq!(truncate("hello world", 5), "hello");
}

#[test]
fn test_truncate_unicode_boundary() {
    let s = "привет";
    let result = truncate(s, 5);
    assert_eq!(result, "пр");
}

#[test]
fn test_debug_redacts_api_key() {
    let config = LlmConfig::new("super-secret".to_owned(), "http://localhost/".to_owned());
    assert!(!format!("{config:?}").contains("super-secret"));
    let client = LlmClient::new(config).unwrap();
    let debug = format!("{client:?}");
    assert!(!debug.contains("super-secret"));
    assert_eq!(client.base_url(), "http://localhost");
}

#[test]
fn test_config_defaults() {
    let config = LlmConfig::new("k".to_owned(), "http://x".to_owned());
    assert_eq!(config.max_retries, 0);
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.model, "gemini-2.5-flash");
}

#[test]
fn test_failure_mapping() {
    assert_eq!(
        LlmError::Timeout(Duration::from_secs(3)).failure(),
        PipelineFailure::Timeout(Duration::from_secs(3))
    );
    let nested = LlmError::RetriesExhausted(Box::new(LlmError::Timeout(Duration::from_secs(1))));
    assert_eq!(nested.failure().kind(), "timeout");
    assert_eq!(LlmError::EmptyResponse.failure().kind(), "service_unavailable");
}

#[test]
fn test_transient_classification() {
    assert!(LlmError::HttpStatus { code: 429, body: String::new() }.is_transient());
    assert!(LlmError::HttpStatus { code: 502, body: String::new() }.is_transient());
    assert!(!LlmError::HttpStatus { code: 401, body: String::new() }.is_transient());
    assert!(!LlmError::Timeout(Duration::from_secs(1)).is_transient());
}
