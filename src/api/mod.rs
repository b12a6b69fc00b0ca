use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::warn;

use crate::core::error::{GatewayError, QuotaError};
use crate::core::types::{
    DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_SOURCE_LANGUAGE, DEFAULT_TEMPERATURE, TranslationRequest,
    TranslationResult,
};
use crate::gateway::TranslationGateway;
use crate::pricing;
use crate::usage::{AccountContext, QuotaStore, UsageRecord, UsageSink};

/// Request body accepted by the translate route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequestBody {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_lang: Option<String>,
    pub target_lang: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preserve_format: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub improve_grammar: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_changes: Option<bool>,
}

impl From<TranslateRequestBody> for TranslationRequest {
    fn from(body: TranslateRequestBody) -> Self {
        Self {
            text: body.text,
            source_language: body
                .source_lang
                .filter(|lang| !lang.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SOURCE_LANGUAGE.to_string()),
            target_language: body.target_lang,
            model: body.model,
            style: body.style,
            temperature: body.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_output_tokens: body.max_tokens.unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS),
            preserve_formatting: body.preserve_format.unwrap_or(true),
            improve_grammar: body.improve_grammar.unwrap_or(true),
            show_changes: body.show_changes.unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    pub model: String,
    pub provider: String,
    pub tokens_used: u64,
    pub cost: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateResponseBody {
    pub translation: String,
    pub metadata: ResponseMetadata,
}

impl TranslateResponseBody {
    pub fn new(model: &str, result: &TranslationResult) -> Self {
        Self {
            translation: result.translated_text.clone(),
            metadata: ResponseMetadata {
                model: model.to_string(),
                provider: result.provider.to_string(),
                tokens_used: result.tokens_used,
                cost: pricing::format_cost(result.cost),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl From<&GatewayError> for ErrorBody {
    fn from(error: &GatewayError) -> Self {
        let details = match error {
            GatewayError::ModelUnavailable { available, .. } => {
                Some(json!({ "availableModels": available }))
            }
            GatewayError::TranslationFailed {
                provider, message, ..
            } => Some(json!({ "provider": provider, "message": message })),
            GatewayError::InvalidInput { .. } | GatewayError::UnknownModel { .. } => None,
        };

        Self {
            error: error.to_string(),
            details,
        }
    }
}

impl From<&QuotaError> for ErrorBody {
    fn from(error: &QuotaError) -> Self {
        let details = match error {
            QuotaError::Exceeded { limit, used, .. } => json!({ "limit": limit, "used": used }),
        };

        Self {
            error: error.to_string(),
            details: Some(details),
        }
    }
}

/// Status code plus JSON body, ready for whatever HTTP server hosts the route.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    fn ok(body: &TranslateResponseBody) -> Self {
        Self {
            status: 200,
            body: json!(body),
        }
    }

    fn error(status: u16, body: &ErrorBody) -> Self {
        Self {
            status,
            body: json!(body),
        }
    }
}

/// The caller side of the gateway: quota check, translate, record usage.
pub struct TranslateHandler {
    gateway: Arc<TranslationGateway>,
    quota: Arc<dyn QuotaStore>,
    usage: Arc<dyn UsageSink>,
}

impl TranslateHandler {
    pub fn new(
        gateway: Arc<TranslationGateway>,
        quota: Arc<dyn QuotaStore>,
        usage: Arc<dyn UsageSink>,
    ) -> Self {
        Self {
            gateway,
            quota,
            usage,
        }
    }

    pub async fn handle_json(&self, account: &AccountContext, raw_body: &str) -> ApiResponse {
        match serde_json::from_str::<TranslateRequestBody>(raw_body) {
            Ok(body) => self.handle(account, body).await,
            Err(error) => {
                let error = GatewayError::invalid_input(format!("invalid request body: {error}"));
                ApiResponse::error(error.status_code(), &ErrorBody::from(&error))
            }
        }
    }

    pub async fn handle(
        &self,
        account: &AccountContext,
        body: TranslateRequestBody,
    ) -> ApiResponse {
        if let Err(error) = self.quota.check(account).await {
            warn!(account = %account.account_id, %error, "quota check rejected request");
            return ApiResponse::error(error.status_code(), &ErrorBody::from(&error));
        }

        let request = TranslationRequest::from(body);
        match self.gateway.translate(&request).await {
            Ok(result) => {
                self.usage
                    .record(UsageRecord::from_result(&account.account_id, &request.model, &result))
                    .await;
                ApiResponse::ok(&TranslateResponseBody::new(&request.model, &result))
            }
            Err(error) => ApiResponse::error(error.status_code(), &ErrorBody::from(&error)),
        }
    }
}
