use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde_json::{Value, json};

use crate::config::{ANTHROPIC_DEFAULT_BASE_URL, sanitize_api_key};
use crate::core::error::{ConfigError, ProviderError};
use crate::core::traits::ProviderAdapter;
use crate::core::types::{AdapterOutput, AdapterRequest, ProviderTag, Usage};
use crate::providers::wire_codec::WireCodec;
use crate::providers::{normalize_base_url, protocol_error, require_api_key};
use crate::transport::http::{HttpTransport, insert_header};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic messages adapter: the system prompt travels in its own field
/// next to a single user message.
pub struct AnthropicAdapter {
    transport: HttpTransport,
    codec: AnthropicMessagesCodec,
    base_url: String,
    api_key: Option<String>,
}

impl AnthropicAdapter {
    pub fn new(api_key: Option<String>, timeout_ms: u64) -> Result<Self, ConfigError> {
        let transport = HttpTransport::new(timeout_ms)?;
        Ok(Self::with_transport(api_key, ANTHROPIC_DEFAULT_BASE_URL, transport))
    }

    pub fn with_transport(
        api_key: Option<String>,
        base_url: &str,
        transport: HttpTransport,
    ) -> Self {
        Self {
            transport,
            codec: AnthropicMessagesCodec,
            base_url: normalize_base_url(base_url, ANTHROPIC_DEFAULT_BASE_URL),
            api_key: sanitize_api_key(api_key),
        }
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }

    fn headers(api_key: &str) -> Result<HeaderMap, ProviderError> {
        let mut headers = HeaderMap::new();
        insert_header(&mut headers, ProviderTag::Anthropic, "x-api-key", api_key)?;
        insert_header(
            &mut headers,
            ProviderTag::Anthropic,
            "anthropic-version",
            ANTHROPIC_VERSION,
        )?;
        Ok(headers)
    }

    /// Anthropic wraps failures as `{"type":"error","error":{"message":...}}`;
    /// surface just the message.
    fn normalize_status_error(error: ProviderError) -> ProviderError {
        match error {
            ProviderError::Status {
                provider,
                model,
                status_code,
                request_id,
                message,
            } => {
                let message = serde_json::from_str::<Value>(&message)
                    .ok()
                    .and_then(|envelope| {
                        envelope
                            .pointer("/error/message")
                            .and_then(Value::as_str)
                            .map(str::to_string)
                    })
                    .unwrap_or(message);

                ProviderError::Status {
                    provider,
                    model,
                    status_code,
                    request_id,
                    message,
                }
            }
            other => other,
        }
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicAdapter {
    fn provider(&self) -> ProviderTag {
        ProviderTag::Anthropic
    }

    async fn invoke(&self, req: &AdapterRequest) -> Result<AdapterOutput, ProviderError> {
        let api_key = require_api_key(ProviderTag::Anthropic, self.api_key.as_ref())?;

        let body: Value = self
            .transport
            .post_json(
                ProviderTag::Anthropic,
                &req.wire_model,
                &self.messages_url(),
                Self::headers(api_key)?,
                &self.codec.encode_request(req),
            )
            .await
            .map_err(Self::normalize_status_error)?;

        self.codec.decode_response(req, &body)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct AnthropicMessagesCodec;

impl WireCodec for AnthropicMessagesCodec {
    fn encode_request(&self, req: &AdapterRequest) -> Value {
        json!({
            "model": req.wire_model,
            "system": req.system_prompt,
            "messages": [
                { "role": "user", "content": req.user_prompt },
            ],
            "max_tokens": req.max_output_tokens,
            "temperature": req.temperature,
        })
    }

    fn decode_response(
        &self,
        req: &AdapterRequest,
        body: &Value,
    ) -> Result<AdapterOutput, ProviderError> {
        let model = req.wire_model.as_str();
        let blocks = body
            .get("content")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                protocol_error(ProviderTag::Anthropic, model, "response missing content")
            })?;

        let first = blocks
            .first()
            .ok_or_else(|| protocol_error(ProviderTag::Anthropic, model, "empty content"))?;
        let block_type = first
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("<missing>");
        if block_type != "text" {
            return Err(ProviderError::UnsupportedContentType {
                provider: ProviderTag::Anthropic,
                model: Some(model.to_string()),
                content_type: block_type.to_string(),
            });
        }

        let text: String = blocks
            .iter()
            .take_while(|block| block.get("type").and_then(Value::as_str) == Some("text"))
            .filter_map(|block| block.get("text").and_then(Value::as_str))
            .collect();
        if text.trim().is_empty() {
            return Err(protocol_error(ProviderTag::Anthropic, model, "empty output"));
        }

        let usage = body.get("usage").and_then(|usage| {
            let input = usage.get("input_tokens").and_then(Value::as_u64)?;
            let output = usage.get("output_tokens").and_then(Value::as_u64)?;
            Some(Usage::split(input, output))
        });

        Ok(AdapterOutput { text, usage })
    }
}

#[cfg(test)]
mod tests;
