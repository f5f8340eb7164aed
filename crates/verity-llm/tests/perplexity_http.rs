//! HTTP-level tests for the Perplexity provider against a local mock server

use serde_json::json;
use verity_domain::ResearchProvider;
use verity_llm::{LlmError, PerplexityProvider};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn provider_for(server: &MockServer) -> PerplexityProvider {
    PerplexityProvider::new("test-key", "sonar-test")
        .expect("key is non-empty")
        .with_endpoint(format!("{}/chat/completions", server.uri()))
}

#[tokio::test]
async fn returns_first_choice_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "sonar-test",
            "messages": [{ "role": "user", "content": "research Dr. Health" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "abc",
            "choices": [
                { "message": { "role": "assistant", "content": "Here you go: {\"name\": \"Dr. Health\"}" } },
                { "message": { "role": "assistant", "content": "ignored" } }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server).await;
    let text = provider.complete("research Dr. Health").await.unwrap();
    assert_eq!(text, "Here you go: {\"name\": \"Dr. Health\"}");
}

#[tokio::test]
async fn non_success_status_carries_code_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let provider = provider_for(&server).await;
    match provider.complete("anything").await {
        Err(LlmError::Status { status, body }) => {
            assert_eq!(status, 401);
            assert_eq!(body, "invalid api key");
        }
        other => panic!("Expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn empty_choices_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let provider = provider_for(&server).await;
    let result = provider.complete("anything").await;
    assert!(matches!(result, Err(LlmError::InvalidResponse(_))));
}

#[tokio::test]
async fn undecodable_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let provider = provider_for(&server).await;
    let result = provider.complete("anything").await;
    assert!(matches!(result, Err(LlmError::InvalidResponse(_))));
}

#[tokio::test]
async fn slow_provider_times_out_as_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "choices": [{ "message": { "content": "late" } }] }))
                .set_delay(std::time::Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let provider = provider_for(&server)
        .await
        .with_timeout(std::time::Duration::from_millis(50));
    let result = provider.complete("anything").await;
    assert!(matches!(result, Err(LlmError::Transport(_))));
}
