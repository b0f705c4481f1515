mod common;

use relay_common::RelayError;
use relay_llm::openai::OpenAiClient;
use relay_llm::traits::{LlmClient, StructuredOutput};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> OpenAiClient {
    OpenAiClient::with_base_url("sk-test".into(), "gpt-4o-mini".into(), &server.uri())
        .expect("client builds")
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "model": "gpt-4o-mini-2024-07-18",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 20, "completion_tokens": 5, "total_tokens": 25}
    })
}

#[tokio::test]
async fn structured_call_sends_schema_and_returns_content() {
    common::init_test_tracing();
    let server = MockServer::start().await;
    let schema = json!({"type": "object", "properties": {"result": {"type": "string"}}});

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "temperature": 0.0,
            "top_p": 1.0,
            "messages": [
                {"role": "system", "content": "classify"},
                {"role": "user", "content": "Some article text"}
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {"name": "verdict", "schema": schema.clone()}
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(r#"{"result":"real"}"#)))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client_for(&server)
        .generate_structured(
            "Some article text",
            "classify",
            &StructuredOutput::new("verdict", schema),
        )
        .await
        .expect("completion");

    assert_eq!(resp.text, r#"{"result":"real"}"#);
    assert_eq!(resp.model.as_deref(), Some("gpt-4o-mini-2024-07-18"));
    assert_eq!(resp.tokens_used, Some(25));
    let raw = resp.raw.expect("raw reply kept");
    assert_eq!(raw["id"], "chatcmpl-1");
}

#[tokio::test]
async fn plain_generate_passes_knobs() {
    common::init_test_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({"max_tokens": 64, "temperature": 0.5})))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("ha")))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client_for(&server)
        .generate("tell a joke", Some("you are funny"), Some(64), Some(0.5))
        .await
        .expect("completion");
    assert_eq!(resp.text, "ha");
}

#[tokio::test]
async fn provider_error_is_upstream_without_retry() {
    common::init_test_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": {"message": "The server had an error", "type": "server_error"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .generate("hello", None, None, None)
        .await
        .expect_err("500 must fail");
    match err {
        RelayError::Upstream(msg) => assert!(msg.contains("The server had an error")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn missing_choices_is_unexpected_response() {
    common::init_test_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .generate("hello", None, None, None)
        .await
        .expect_err("no choices");
    assert!(matches!(err, RelayError::UnexpectedResponse(_)));
}

#[tokio::test]
async fn null_content_is_unexpected_response() {
    common::init_test_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": null}}]
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .generate("hello", None, None, None)
        .await
        .expect_err("null content");
    assert!(matches!(err, RelayError::UnexpectedResponse(_)));
}

#[tokio::test]
async fn non_json_body_is_unexpected_response() {
    common::init_test_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .generate("hello", None, None, None)
        .await
        .expect_err("html body");
    assert!(matches!(err, RelayError::UnexpectedResponse(_)));
}
