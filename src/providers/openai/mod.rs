use async_trait::async_trait;
use serde_json::{Value, json};

use crate::config::{OPENAI_DEFAULT_BASE_URL, sanitize_api_key};
use crate::core::error::{ConfigError, ProviderError};
use crate::core::traits::ProviderAdapter;
use crate::core::types::{AdapterOutput, AdapterRequest, ProviderTag, Usage};
use crate::providers::wire_codec::WireCodec;
use crate::providers::{normalize_base_url, protocol_error, require_api_key};
use crate::transport::http::{HttpTransport, bearer_headers};

/// OpenAI chat-completions adapter: system and user prompts travel as two
/// messages.
pub struct OpenAiAdapter {
    transport: HttpTransport,
    codec: OpenAiChatCodec,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAiAdapter {
    pub fn new(api_key: Option<String>, timeout_ms: u64) -> Result<Self, ConfigError> {
        let transport = HttpTransport::new(timeout_ms)?;
        Ok(Self::with_transport(api_key, OPENAI_DEFAULT_BASE_URL, transport))
    }

    pub fn with_transport(
        api_key: Option<String>,
        base_url: &str,
        transport: HttpTransport,
    ) -> Self {
        Self {
            transport,
            codec: OpenAiChatCodec,
            base_url: normalize_base_url(base_url, OPENAI_DEFAULT_BASE_URL),
            api_key: sanitize_api_key(api_key),
        }
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiAdapter {
    fn provider(&self) -> ProviderTag {
        ProviderTag::Openai
    }

    async fn invoke(&self, req: &AdapterRequest) -> Result<AdapterOutput, ProviderError> {
        let api_key = require_api_key(ProviderTag::Openai, self.api_key.as_ref())?;
        let headers = bearer_headers(ProviderTag::Openai, api_key)?;

        let body: Value = self
            .transport
            .post_json(
                ProviderTag::Openai,
                &req.wire_model,
                &self.chat_completions_url(),
                headers,
                &self.codec.encode_request(req),
            )
            .await?;

        self.codec.decode_response(req, &body)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct OpenAiChatCodec;

impl WireCodec for OpenAiChatCodec {
    fn encode_request(&self, req: &AdapterRequest) -> Value {
        json!({
            "model": req.wire_model,
            "messages": [
                { "role": "system", "content": req.system_prompt },
                { "role": "user", "content": req.user_prompt },
            ],
            "temperature": req.temperature,
            "max_tokens": req.max_output_tokens,
        })
    }

    fn decode_response(
        &self,
        req: &AdapterRequest,
        body: &Value,
    ) -> Result<AdapterOutput, ProviderError> {
        let model = req.wire_model.as_str();
        let message = body
            .get("choices")
            .and_then(Value::as_array)
            .and_then(|choices| choices.first())
            .and_then(|choice| choice.get("message"))
            .ok_or_else(|| protocol_error(ProviderTag::Openai, model, "response has no choices"))?;

        let text = match message.get("content") {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => {
                return Err(ProviderError::UnsupportedContentType {
                    provider: ProviderTag::Openai,
                    model: Some(model.to_string()),
                    content_type: json_type_name(other).to_string(),
                });
            }
        };
        if text.trim().is_empty() {
            return Err(protocol_error(ProviderTag::Openai, model, "empty output"));
        }

        Ok(AdapterOutput {
            text,
            usage: decode_usage(body.get("usage")),
        })
    }
}

fn decode_usage(usage: Option<&Value>) -> Option<Usage> {
    let usage = usage?;
    let read = |key: &str| usage.get(key).and_then(Value::as_u64);

    let decoded = Usage {
        input_tokens: read("prompt_tokens"),
        output_tokens: read("completion_tokens"),
        total_tokens: read("total_tokens"),
    };
    decoded.derived_total_tokens().map(|_| decoded)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
