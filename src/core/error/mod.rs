use crate::core::types::ProviderTag;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid timeout: {timeout_ms} ms")]
    InvalidTimeout { timeout_ms: u64 },
    #[error("invalid base url for {provider}: {reason}")]
    InvalidBaseUrl {
        provider: ProviderTag,
        reason: String,
    },
    #[error("invalid value for {key}: {value}")]
    InvalidEnvValue { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("provider unavailable [provider={provider}]: no credential configured")]
    Unavailable { provider: ProviderTag },
    #[error(
        "unsupported content type{context}: {content_type}",
        context = format_context(Some(*.provider), .model.as_deref(), None, None)
    )]
    UnsupportedContentType {
        provider: ProviderTag,
        model: Option<String>,
        content_type: String,
    },
    #[error(
        "provider transport error{context}: {message}",
        context = format_context(Some(*.provider), .model.as_deref(), None, None)
    )]
    Transport {
        provider: ProviderTag,
        model: Option<String>,
        message: String,
    },
    #[error(
        "provider status error{context}: {message}",
        context = format_context(
            Some(*.provider),
            .model.as_deref(),
            .request_id.as_deref(),
            Some(*.status_code)
        )
    )]
    Status {
        provider: ProviderTag,
        model: Option<String>,
        status_code: u16,
        request_id: Option<String>,
        message: String,
    },
    #[error(
        "provider protocol error{context}: {message}",
        context = format_context(Some(*.provider), .model.as_deref(), None, None)
    )]
    Protocol {
        provider: ProviderTag,
        model: Option<String>,
        message: String,
    },
    #[error(
        "provider serialization error{context}: {message}",
        context = format_context(Some(*.provider), .model.as_deref(), None, None)
    )]
    Serialization {
        provider: ProviderTag,
        model: Option<String>,
        message: String,
    },
}

impl ProviderError {
    pub fn provider(&self) -> ProviderTag {
        match self {
            Self::Unavailable { provider }
            | Self::UnsupportedContentType { provider, .. }
            | Self::Transport { provider, .. }
            | Self::Status { provider, .. }
            | Self::Protocol { provider, .. }
            | Self::Serialization { provider, .. } => *provider,
        }
    }
}

/// Caller-facing failure of a `translate` call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },
    #[error("unknown model: {model}")]
    UnknownModel { model: String },
    #[error(
        "model unavailable: {model} [available={available}]",
        available = .available.join(", ")
    )]
    ModelUnavailable {
        model: String,
        available: Vec<String>,
    },
    #[error(
        "translation failed{context}: {message}",
        context = format_context(Some(*.provider), Some(.model.as_str()), None, None)
    )]
    TranslationFailed {
        provider: ProviderTag,
        model: String,
        message: String,
    },
}

impl GatewayError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Wraps an adapter failure with the upstream message kept for diagnostics.
    pub fn translation_failed(model: impl Into<String>, error: &ProviderError) -> Self {
        Self::TranslationFailed {
            provider: error.provider(),
            model: model.into(),
            message: error.to_string(),
        }
    }

    /// HTTP status the boundary layer responds with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput { .. }
            | Self::UnknownModel { .. }
            | Self::ModelUnavailable { .. } => 400,
            Self::TranslationFailed { .. } => 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuotaError {
    #[error("quota exceeded [account={account}]: used {used} of {limit} tokens")]
    Exceeded {
        account: String,
        limit: u64,
        used: u64,
    },
}

impl QuotaError {
    pub fn status_code(&self) -> u16 {
        429
    }
}

fn format_context(
    provider: Option<ProviderTag>,
    model: Option<&str>,
    request_id: Option<&str>,
    status_code: Option<u16>,
) -> String {
    let mut context = Vec::new();

    if let Some(provider) = provider {
        context.push(format!("provider={provider}"));
    }
    if let Some(model) = model {
        context.push(format!("model={model}"));
    }
    if let Some(request_id) = request_id {
        context.push(format!("request_id={request_id}"));
    }
    if let Some(status_code) = status_code {
        context.push(format!("status_code={status_code}"));
    }

    if context.is_empty() {
        String::new()
    } else {
        format!(" [{}]", context.join(", "))
    }
}
