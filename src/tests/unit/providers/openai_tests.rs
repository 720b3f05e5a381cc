//! OpenAI Provider Unit Tests
//!
//! Request shape and error mapping against a wiremock server.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::core::llm::{ChatMessage, ChatRequest, LLMError, LLMProvider, OpenAIProvider};

fn provider_for(server: &MockServer) -> OpenAIProvider {
    OpenAIProvider::new(
        "sk-test".to_string(),
        "gpt-4o".to_string(),
        4096,
        Some("org-123".to_string()),
        Some(format!("{}/v1", server.uri())),
    )
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "model": "gpt-4o-2024-08-06",
        "choices": [{
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 12, "completion_tokens": 34}
    })
}

fn request() -> ChatRequest {
    ChatRequest::new(vec![ChatMessage::user("Create a course about: Rust")])
        .with_system("You are Miss Nova")
        .with_temperature(0.7)
}

// =============================================================================
// Success Path
// =============================================================================

#[tokio::test]
async fn test_chat_sends_schema_and_parses_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(header("openai-organization", "org-123"))
        .and(body_partial_json(json!({
            "model": "gpt-4o",
            "response_format": {
                "type": "json_schema",
                "json_schema": {"name": "course", "strict": true}
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("{\"title\":\"T\"}")))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let response = provider
        .chat(request().with_json_schema("course", json!({"type": "object"})))
        .await
        .expect("chat failed");

    assert_eq!(response.content, "{\"title\":\"T\"}");
    assert_eq!(response.model, "gpt-4o-2024-08-06");
    assert_eq!(response.provider, "openai");
    assert_eq!(response.finish_reason.as_deref(), Some("stop"));
    let usage = response.usage.unwrap();
    assert_eq!(usage.total(), 46);
}

#[tokio::test]
async fn test_system_prompt_is_first_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({
            "messages": [
                {"role": "system", "content": "You are Miss Nova"},
                {"role": "user", "content": "Create a course about: Rust"}
            ],
            "temperature": 0.7
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
        .expect(1)
        .mount(&server)
        .await;

    assert!(provider_for(&server).chat(request()).await.is_ok());
}

// =============================================================================
// Error Mapping
// =============================================================================

#[tokio::test]
async fn test_rate_limit_reads_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
        .mount(&server)
        .await;

    let err = provider_for(&server).chat(request()).await.unwrap_err();
    assert!(matches!(err, LLMError::RateLimited { retry_after_secs: 7 }));
}

#[tokio::test]
async fn test_invalid_api_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = provider_for(&server).chat(request()).await.unwrap_err();
    assert!(matches!(err, LLMError::AuthError(_)));
}

#[tokio::test]
async fn test_server_error_keeps_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    match provider_for(&server).chat(request()).await.unwrap_err() {
        LLMError::ApiError { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "overloaded");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_refusal_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": null, "refusal": "I can't help with that"}}]
        })))
        .mount(&server)
        .await;

    let err = provider_for(&server).chat(request()).await.unwrap_err();
    assert!(matches!(err, LLMError::Refused(msg) if msg.contains("can't help")));
}

#[tokio::test]
async fn test_missing_choices_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = provider_for(&server).chat(request()).await.unwrap_err();
    assert!(matches!(err, LLMError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("late"))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let provider = OpenAIProvider::with_timeout(
        "sk-test".to_string(),
        "gpt-4o".to_string(),
        4096,
        None,
        Some(format!("{}/v1", server.uri())),
        Duration::from_millis(200),
    );

    let err = provider.chat(request()).await.unwrap_err();
    assert!(matches!(err, LLMError::Timeout));
}
