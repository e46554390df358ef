//! Wiremock tests for the OpenRouter chat-completions client.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use verdandi::providers::OpenRouterClient;
use verdandi::types::CompletionOptions;
use verdandi::{CompletionProvider, VerdandiError};

fn client(server: &MockServer) -> OpenRouterClient {
    OpenRouterClient::with_base_url("test_key", server.uri())
}

#[tokio::test]
async fn parses_content_and_token_usage() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer test_key"))
        .and(body_partial_json(json!({"model": "test/model"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [
                {"message": {"role": "assistant", "content": "{\"title\": \"A Path\"}"}}
            ],
            "usage": {"prompt_tokens": 40, "completion_tokens": 60, "total_tokens": 100}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let completion = client(&server)
        .complete("test/model", "a prompt", &CompletionOptions::default())
        .await
        .unwrap();

    assert_eq!(completion.text, "{\"title\": \"A Path\"}");
    assert_eq!(completion.tokens_used, 100);
}

#[tokio::test]
async fn missing_usage_reports_zero_tokens() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "{}"}}]
        })))
        .mount(&server)
        .await;

    let completion = client(&server)
        .complete("test/model", "p", &CompletionOptions::default())
        .await
        .unwrap();
    assert_eq!(completion.tokens_used, 0);
}

#[tokio::test]
async fn empty_choices_is_an_empty_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = client(&server)
        .complete("test/model", "p", &CompletionOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, VerdandiError::EmptyResponse));
}

#[tokio::test]
async fn unauthorized_maps_to_authentication_failed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client(&server)
        .complete("test/model", "p", &CompletionOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, VerdandiError::AuthenticationFailed));
}

#[tokio::test]
async fn unknown_model_maps_to_model_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client(&server)
        .complete("missing/model", "p", &CompletionOptions::default())
        .await
        .unwrap_err();
    match err {
        VerdandiError::ModelNotFound(model) => assert_eq!(model, "missing/model"),
        other => panic!("expected ModelNotFound, got {other}"),
    }
}

#[tokio::test]
async fn server_errors_map_to_api_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client(&server)
        .complete("test/model", "p", &CompletionOptions::default())
        .await
        .unwrap_err();
    match err {
        VerdandiError::Api { status, .. } => assert_eq!(status, 503),
        other => panic!("expected Api error, got {other}"),
    }
}

#[tokio::test]
async fn malformed_body_is_an_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&server)
        .await;

    let err = client(&server)
        .complete("test/model", "p", &CompletionOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, VerdandiError::Http(_)));
}
