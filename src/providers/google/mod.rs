use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde_json::{Value, json};

use crate::config::{GOOGLE_DEFAULT_BASE_URL, sanitize_api_key};
use crate::core::error::{ConfigError, ProviderError};
use crate::core::traits::ProviderAdapter;
use crate::core::types::{AdapterOutput, AdapterRequest, ProviderTag};
use crate::providers::wire_codec::{WireCodec, combined_prompt};
use crate::providers::{normalize_base_url, protocol_error, require_api_key};
use crate::transport::http::{HttpTransport, insert_header};

/// Google generative-content adapter. The wire format has no system role, so
/// both prompts are merged into one user turn. Token usage is never taken from
/// the response; the gateway estimates it.
pub struct GoogleAdapter {
    transport: HttpTransport,
    codec: GoogleGenerateContentCodec,
    base_url: String,
    api_key: Option<String>,
}

impl GoogleAdapter {
    pub fn new(api_key: Option<String>, timeout_ms: u64) -> Result<Self, ConfigError> {
        let transport = HttpTransport::new(timeout_ms)?;
        Ok(Self::with_transport(api_key, GOOGLE_DEFAULT_BASE_URL, transport))
    }

    pub fn with_transport(
        api_key: Option<String>,
        base_url: &str,
        transport: HttpTransport,
    ) -> Self {
        Self {
            transport,
            codec: GoogleGenerateContentCodec,
            base_url: normalize_base_url(base_url, GOOGLE_DEFAULT_BASE_URL),
            api_key: sanitize_api_key(api_key),
        }
    }

    fn generate_content_url(&self, wire_model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, wire_model
        )
    }
}

#[async_trait]
impl ProviderAdapter for GoogleAdapter {
    fn provider(&self) -> ProviderTag {
        ProviderTag::Google
    }

    async fn invoke(&self, req: &AdapterRequest) -> Result<AdapterOutput, ProviderError> {
        let api_key = require_api_key(ProviderTag::Google, self.api_key.as_ref())?;
        let mut headers = HeaderMap::new();
        insert_header(&mut headers, ProviderTag::Google, "x-goog-api-key", api_key)?;

        let body: Value = self
            .transport
            .post_json(
                ProviderTag::Google,
                &req.wire_model,
                &self.generate_content_url(&req.wire_model),
                headers,
                &self.codec.encode_request(req),
            )
            .await?;

        self.codec.decode_response(req, &body)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct GoogleGenerateContentCodec;

impl WireCodec for GoogleGenerateContentCodec {
    fn encode_request(&self, req: &AdapterRequest) -> Value {
        json!({
            "contents": [
                { "role": "user", "parts": [{ "text": combined_prompt(req) }] },
            ],
            "generationConfig": {
                "temperature": req.temperature,
                "maxOutputTokens": req.max_output_tokens,
            },
        })
    }

    fn decode_response(
        &self,
        req: &AdapterRequest,
        body: &Value,
    ) -> Result<AdapterOutput, ProviderError> {
        let model = req.wire_model.as_str();

        if let Some(reason) = body
            .pointer("/promptFeedback/blockReason")
            .and_then(Value::as_str)
        {
            return Err(protocol_error(
                ProviderTag::Google,
                model,
                format!("prompt blocked: {reason}"),
            ));
        }

        let candidate = body
            .get("candidates")
            .and_then(Value::as_array)
            .and_then(|candidates| candidates.first())
            .ok_or_else(|| {
                protocol_error(ProviderTag::Google, model, "response has no candidates")
            })?;

        let text: String = candidate
            .pointer("/content/parts")
            .and_then(Value::as_array)
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|part| part.get("text").and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            let finish_reason = candidate
                .get("finishReason")
                .and_then(Value::as_str)
                .unwrap_or("unknown");
            return Err(protocol_error(
                ProviderTag::Google,
                model,
                format!("empty output (finish_reason={finish_reason})"),
            ));
        }

        Ok(AdapterOutput { text, usage: None })
    }
}
