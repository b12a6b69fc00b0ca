use serde_json::json;

use super::*;
use crate::test_support::{MockResponse, MockServer};

fn request() -> AdapterRequest {
    AdapterRequest {
        wire_model: "claude-3-opus-20240229".to_string(),
        system_prompt: "You translate chemistry.".to_string(),
        user_prompt: "Sodium chloride dissolves.".to_string(),
        temperature: 0.3,
        max_output_tokens: 512,
    }
}

fn adapter(api_key: Option<&str>, base_url: &str) -> AnthropicAdapter {
    AnthropicAdapter::with_transport(
        api_key.map(str::to_string),
        base_url,
        HttpTransport::new(2_000).expect("transport"),
    )
}

#[test]
fn test_encode_keeps_system_separate_from_single_user_message() {
    let body = AnthropicMessagesCodec.encode_request(&request());

    assert_eq!(body["system"], json!("You translate chemistry."));
    assert_eq!(
        body["messages"],
        json!([{"role": "user", "content": "Sodium chloride dissolves."}])
    );
    assert_eq!(body["max_tokens"], json!(512));
    assert_eq!(body["model"], json!("claude-3-opus-20240229"));
}

#[test]
fn test_decode_sums_input_and_output_tokens() {
    let body = json!({
        "content": [{"type": "text", "text": "Хлорид натрия растворяется."}],
        "usage": {"input_tokens": 40, "output_tokens": 11},
    });

    let output = AnthropicMessagesCodec
        .decode_response(&request(), &body)
        .expect("decode");

    assert_eq!(output.text, "Хлорид натрия растворяется.");
    let usage = output.usage.expect("usage");
    assert_eq!(usage.derived_total_tokens(), Some(51));
    assert_eq!(usage.input_tokens, Some(40));
    assert_eq!(usage.output_tokens, Some(11));
}

#[test]
fn test_decode_concatenates_leading_text_blocks() {
    let body = json!({
        "content": [
            {"type": "text", "text": "part one, "},
            {"type": "text", "text": "part two"},
            {"type": "tool_use", "id": "t1"},
        ],
    });

    let output = AnthropicMessagesCodec
        .decode_response(&request(), &body)
        .expect("decode");

    assert_eq!(output.text, "part one, part two");
    assert_eq!(output.usage, None);
}

#[test]
fn test_decode_non_text_first_block_is_unsupported() {
    let body = json!({
        "content": [{"type": "tool_use", "id": "t1", "name": "calc", "input": {}}],
        "usage": {"input_tokens": 1, "output_tokens": 1},
    });

    let error = AnthropicMessagesCodec
        .decode_response(&request(), &body)
        .expect_err("tool_use first block must fail");

    assert_eq!(
        error,
        ProviderError::UnsupportedContentType {
            provider: ProviderTag::Anthropic,
            model: Some("claude-3-opus-20240229".to_string()),
            content_type: "tool_use".to_string(),
        }
    );
}

#[test]
fn test_decode_empty_content_is_protocol_error() {
    let result = AnthropicMessagesCodec.decode_response(&request(), &json!({"content": []}));
    assert!(matches!(result, Err(ProviderError::Protocol { .. })));
}

#[tokio::test]
async fn test_invoke_without_key_is_unavailable() {
    let result = adapter(None, "http://127.0.0.1:9").invoke(&request()).await;

    assert_eq!(
        result,
        Err(ProviderError::Unavailable {
            provider: ProviderTag::Anthropic
        })
    );
}

#[tokio::test]
async fn test_invoke_sends_version_and_key_headers() {
    let server = MockServer::start(vec![MockResponse::json(
        json!({
            "content": [{"type": "text", "text": "ok"}],
            "usage": {"input_tokens": 3, "output_tokens": 1},
        })
        .to_string(),
    )]);

    let output = adapter(Some("ak-test"), &server.url())
        .invoke(&request())
        .await
        .expect("invoke");
    assert_eq!(output.text, "ok");

    let captured = server.finish();
    assert_eq!(captured[0].path, "/v1/messages");
    assert_eq!(
        captured[0].headers.get("x-api-key").map(String::as_str),
        Some("ak-test")
    );
    assert_eq!(
        captured[0]
            .headers
            .get("anthropic-version")
            .map(String::as_str),
        Some("2023-06-01")
    );
}

#[tokio::test]
async fn test_invoke_unwraps_error_envelope() {
    let server = MockServer::start(vec![
        MockResponse::status(
            401,
            json!({
                "type": "error",
                "error": {"type": "authentication_error", "message": "invalid x-api-key"},
            })
            .to_string(),
        )
        .with_header("request-id", "req_abc"),
    ]);

    let error = adapter(Some("bad"), &server.url())
        .invoke(&request())
        .await
        .expect_err("401 should fail");

    assert_eq!(
        error,
        ProviderError::Status {
            provider: ProviderTag::Anthropic,
            model: Some("claude-3-opus-20240229".to_string()),
            status_code: 401,
            request_id: Some("req_abc".to_string()),
            message: "invalid x-api-key".to_string(),
        }
    );
    server.finish();
}
