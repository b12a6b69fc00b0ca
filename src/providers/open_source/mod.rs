use async_trait::async_trait;
use serde_json::{Value, json};

use crate::config::{OPEN_SOURCE_DEFAULT_BASE_URL, sanitize_api_key};
use crate::core::error::{ConfigError, ProviderError};
use crate::core::traits::ProviderAdapter;
use crate::core::types::{AdapterOutput, AdapterRequest, ProviderTag};
use crate::providers::wire_codec::{WireCodec, combined_prompt};
use crate::providers::{normalize_base_url, protocol_error, require_api_key};
use crate::transport::http::{HttpTransport, bearer_headers};

/// Best-effort adapter for open-weight models behind a completion-style
/// endpoint. Hosts disagree on token accounting, so reported usage is dropped.
pub struct OpenSourceAdapter {
    transport: HttpTransport,
    codec: CompletionCodec,
    base_url: String,
    api_key: Option<String>,
}

impl OpenSourceAdapter {
    pub fn new(api_key: Option<String>, timeout_ms: u64) -> Result<Self, ConfigError> {
        let transport = HttpTransport::new(timeout_ms)?;
        Ok(Self::with_transport(api_key, OPEN_SOURCE_DEFAULT_BASE_URL, transport))
    }

    pub fn with_transport(
        api_key: Option<String>,
        base_url: &str,
        transport: HttpTransport,
    ) -> Self {
        Self {
            transport,
            codec: CompletionCodec,
            base_url: normalize_base_url(base_url, OPEN_SOURCE_DEFAULT_BASE_URL),
            api_key: sanitize_api_key(api_key),
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/v1/completions", self.base_url)
    }
}

#[async_trait]
impl ProviderAdapter for OpenSourceAdapter {
    fn provider(&self) -> ProviderTag {
        ProviderTag::OpenSource
    }

    async fn invoke(&self, req: &AdapterRequest) -> Result<AdapterOutput, ProviderError> {
        let api_key = require_api_key(ProviderTag::OpenSource, self.api_key.as_ref())?;

        let body: Value = self
            .transport
            .post_json(
                ProviderTag::OpenSource,
                &req.wire_model,
                &self.completions_url(),
                bearer_headers(ProviderTag::OpenSource, api_key)?,
                &self.codec.encode_request(req),
            )
            .await?;

        self.codec.decode_response(req, &body)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct CompletionCodec;

impl WireCodec for CompletionCodec {
    fn encode_request(&self, req: &AdapterRequest) -> Value {
        json!({
            "model": req.wire_model,
            "prompt": combined_prompt(req),
            "temperature": req.temperature,
            "max_tokens": req.max_output_tokens,
        })
    }

    fn decode_response(
        &self,
        req: &AdapterRequest,
        body: &Value,
    ) -> Result<AdapterOutput, ProviderError> {
        let text = body
            .pointer("/choices/0/text")
            .and_then(Value::as_str)
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(protocol_error(ProviderTag::OpenSource, &req.wire_model, "empty output"));
        }

        Ok(AdapterOutput {
            text: text.to_string(),
            usage: None,
        })
    }
}
