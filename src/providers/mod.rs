use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::core::error::{ConfigError, ProviderError};
use crate::core::traits::ProviderAdapter;
use crate::core::types::ProviderTag;
use crate::transport::http::HttpTransport;

pub mod anthropic;
pub mod google;
pub mod open_source;
pub mod openai;
pub(crate) mod wire_codec;

/// Builds one adapter per provider from a configuration snapshot. Missing
/// credentials do not fail here; the adapter reports them on first use.
pub fn adapters_from_config(
    config: &GatewayConfig,
) -> Result<Vec<Arc<dyn ProviderAdapter>>, ConfigError> {
    let transport = HttpTransport::new(config.timeout_ms)?;

    let adapters: Vec<Arc<dyn ProviderAdapter>> = vec![
        Arc::new(openai::OpenAiAdapter::with_transport(
            config.openai.api_key.clone(),
            &config.openai.base_url,
            transport.clone(),
        )),
        Arc::new(anthropic::AnthropicAdapter::with_transport(
            config.anthropic.api_key.clone(),
            &config.anthropic.base_url,
            transport.clone(),
        )),
        Arc::new(google::GoogleAdapter::with_transport(
            config.google.api_key.clone(),
            &config.google.base_url,
            transport.clone(),
        )),
        Arc::new(open_source::OpenSourceAdapter::with_transport(
            config.open_source.api_key.clone(),
            &config.open_source.base_url,
            transport,
        )),
    ];
    Ok(adapters)
}

pub(crate) fn normalize_base_url(base_url: &str, default: &str) -> String {
    let trimmed = base_url.trim();
    if trimmed.is_empty() {
        return default.to_string();
    }

    trimmed.trim_end_matches('/').to_string()
}

pub(crate) fn require_api_key(
    provider: ProviderTag,
    api_key: Option<&String>,
) -> Result<&str, ProviderError> {
    api_key
        .map(String::as_str)
        .ok_or(ProviderError::Unavailable { provider })
}

pub(crate) fn protocol_error(
    provider: ProviderTag,
    model: &str,
    message: impl Into<String>,
) -> ProviderError {
    ProviderError::Protocol {
        provider,
        model: Some(model.to_string()),
        message: message.into(),
    }
}
