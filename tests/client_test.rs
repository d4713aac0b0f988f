use git_reword::llm::{CompletionClient, CompletionError};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> CompletionClient {
    CompletionClient::new(
        "gpt-3.5-turbo".to_string(),
        "sk-test".to_string(),
        Some(server.uri()),
        10_000,
    )
}

#[tokio::test]
async fn returns_first_choice_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [
                {"message": {"role": "assistant", "content": "  feat: add parser\n"}},
                {"message": {"role": "assistant", "content": "ignored"}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let message = test_client(&server)
        .improve_message("+fn parse() {}", "wip")
        .await
        .unwrap();

    // Verbatim and untrimmed
    assert_eq!(message, "  feat: add parser\n");
}

#[tokio::test]
async fn sends_model_and_current_message_in_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({"model": "gpt-3.5-turbo", "stream": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "ok"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    test_client(&server)
        .improve_message("+line", "old message")
        .await
        .unwrap();
}

#[tokio::test]
async fn http_error_surfaces_as_request_failed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .improve_message("+line", "old")
        .await
        .unwrap_err();

    match err.downcast_ref::<CompletionError>() {
        Some(CompletionError::RequestFailed(msg)) => {
            assert!(msg.contains("401"));
            assert!(msg.contains("invalid api key"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn empty_choices_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .improve_message("+line", "old")
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<CompletionError>(),
        Some(CompletionError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn non_json_body_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .improve_message("+line", "old")
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<CompletionError>(),
        Some(CompletionError::InvalidResponse(_))
    ));
}
