use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::catalog::StyleCatalog;
use crate::config::{EnvCredentials, GatewayConfig};
use crate::core::error::{ConfigError, GatewayError, ProviderError};
use crate::core::traits::{CredentialSource, ProviderAdapter};
use crate::core::types::{
    AdapterOutput, AdapterRequest, CostEstimate, MAX_TEXT_UTF16_UNITS, ModelDescriptor,
    ProviderTag, TranslationRequest, TranslationResult,
};
use crate::pricing::{self, TokenSource};
use crate::prompt;
use crate::providers;
use crate::registry::ModelRegistry;

/// Routes a translation request to the provider serving its model and
/// normalizes the outcome. Holds no mutable state; concurrent calls need no
/// coordination.
pub struct TranslationGateway {
    registry: ModelRegistry,
    styles: StyleCatalog,
    adapters: AdapterSet,
}

pub struct TranslationGatewayBuilder {
    adapters: AdapterSet,
    registry: Option<ModelRegistry>,
    credentials: Option<Arc<dyn CredentialSource>>,
    styles: StyleCatalog,
}

#[derive(Default)]
struct AdapterSet {
    openai: Option<Arc<dyn ProviderAdapter>>,
    anthropic: Option<Arc<dyn ProviderAdapter>>,
    google: Option<Arc<dyn ProviderAdapter>>,
    open_source: Option<Arc<dyn ProviderAdapter>>,
}

impl AdapterSet {
    fn slot(&mut self, provider: ProviderTag) -> &mut Option<Arc<dyn ProviderAdapter>> {
        match provider {
            ProviderTag::Openai => &mut self.openai,
            ProviderTag::Anthropic => &mut self.anthropic,
            ProviderTag::Google => &mut self.google,
            ProviderTag::OpenSource => &mut self.open_source,
        }
    }

    fn get(&self, provider: ProviderTag) -> Option<&Arc<dyn ProviderAdapter>> {
        match provider {
            ProviderTag::Openai => self.openai.as_ref(),
            ProviderTag::Anthropic => self.anthropic.as_ref(),
            ProviderTag::Google => self.google.as_ref(),
            ProviderTag::OpenSource => self.open_source.as_ref(),
        }
    }
}

impl TranslationGateway {
    pub fn builder() -> TranslationGatewayBuilder {
        TranslationGatewayBuilder {
            adapters: AdapterSet::default(),
            registry: None,
            credentials: None,
            styles: StyleCatalog::default(),
        }
    }

    /// Wires HTTP adapters and the built-in registry from one config snapshot.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut builder = Self::builder().with_credentials(Arc::new(config.credentials()));
        for adapter in providers::adapters_from_config(config)? {
            builder = builder.with_adapter(adapter);
        }
        Ok(builder.build())
    }

    pub fn available_models(&self) -> Vec<String> {
        self.registry.available_models()
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn styles(&self) -> &StyleCatalog {
        &self.styles
    }

    pub async fn translate(
        &self,
        request: &TranslationRequest,
    ) -> Result<TranslationResult, GatewayError> {
        let descriptor = self.admit(request)?;

        let style = self.styles.lookup(request.style.as_deref());
        let prompts = prompt::build_prompts(request, style);

        let adapter_request = AdapterRequest {
            wire_model: descriptor.wire_model.clone(),
            system_prompt: prompts.system_prompt.clone(),
            user_prompt: prompts.user_prompt.clone(),
            temperature: request.temperature,
            max_output_tokens: request.max_output_tokens,
        };

        debug!(
            model = %descriptor.id,
            provider = %descriptor.provider,
            style = %style.id,
            "dispatching translation"
        );

        let output = self
            .dispatch(descriptor, &adapter_request)
            .await
            .map_err(|error| {
                warn!(
                    model = %descriptor.id,
                    provider = %descriptor.provider,
                    %error,
                    "translation failed"
                );
                GatewayError::translation_failed(&descriptor.id, &error)
            })?;

        let account = pricing::account_tokens(&prompts, &output.text, output.usage.as_ref());
        if account.source != TokenSource::ProviderReported {
            debug!(
                model = %descriptor.id,
                source = ?account.source,
                "token split estimated from text length"
            );
        }
        let cost = pricing::compute_cost(
            &descriptor.cost,
            account.input_tokens,
            account.output_tokens,
        );

        info!(
            model = %descriptor.id,
            provider = %descriptor.provider,
            tokens_used = account.total_tokens,
            cost,
            "translation completed"
        );

        Ok(TranslationResult {
            translated_text: output.text,
            tokens_used: account.total_tokens,
            input_tokens: account.input_tokens,
            output_tokens: account.output_tokens,
            cost,
            provider: descriptor.provider,
            wire_model: descriptor.wire_model.clone(),
        })
    }

    /// Pre-flight cost bound for a request: prompts are estimated at four
    /// characters per token and the output at its `max_output_tokens` cap.
    /// No provider is contacted.
    pub fn estimate(&self, request: &TranslationRequest) -> Result<CostEstimate, GatewayError> {
        let descriptor = self.admit(request)?;

        let style = self.styles.lookup(request.style.as_deref());
        let prompts = prompt::build_prompts(request, style);
        let input_tokens = pricing::estimate_tokens(
            pricing::text_len(&prompts.system_prompt) + pricing::text_len(&prompts.user_prompt),
        );
        let max_output_tokens = u64::from(request.max_output_tokens);

        Ok(CostEstimate {
            provider: descriptor.provider,
            wire_model: descriptor.wire_model.clone(),
            input_tokens,
            max_output_tokens,
            input_cost: pricing::compute_cost(&descriptor.cost, input_tokens, 0),
            max_cost: pricing::compute_cost(&descriptor.cost, input_tokens, max_output_tokens),
        })
    }

    /// Text checks, then model resolution, then the remaining parameter checks.
    fn admit(&self, request: &TranslationRequest) -> Result<&ModelDescriptor, GatewayError> {
        validate_text(&request.text)?;
        let descriptor = self.resolve_available(&request.model)?;
        validate_parameters(request)?;
        Ok(descriptor)
    }

    fn resolve_available(&self, model_id: &str) -> Result<&ModelDescriptor, GatewayError> {
        let descriptor = self.registry.resolve(model_id)?;
        if !self.registry.is_available(model_id) {
            return Err(GatewayError::ModelUnavailable {
                model: model_id.to_string(),
                available: self.registry.available_models(),
            });
        }
        Ok(descriptor)
    }

    async fn dispatch(
        &self,
        descriptor: &ModelDescriptor,
        request: &AdapterRequest,
    ) -> Result<AdapterOutput, ProviderError> {
        let adapter = self
            .adapters
            .get(descriptor.provider)
            .ok_or(ProviderError::Unavailable {
                provider: descriptor.provider,
            })?;

        adapter.invoke(request).await
    }
}

impl TranslationGatewayBuilder {
    /// Registers an adapter under the provider it reports; a later adapter for
    /// the same provider replaces the earlier one.
    pub fn with_adapter(mut self, adapter: Arc<dyn ProviderAdapter>) -> Self {
        let provider = adapter.provider();
        *self.adapters.slot(provider) = Some(adapter);
        self
    }

    pub fn with_model_registry(mut self, registry: ModelRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Credential source for the built-in registry. Ignored when a registry is
    /// supplied explicitly.
    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialSource>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_style_catalog(mut self, styles: StyleCatalog) -> Self {
        self.styles = styles;
        self
    }

    pub fn build(self) -> TranslationGateway {
        let registry = match (self.registry, self.credentials) {
            (Some(registry), _) => registry,
            (None, Some(credentials)) => ModelRegistry::with_builtin_models(credentials),
            (None, None) => ModelRegistry::with_builtin_models(Arc::new(EnvCredentials)),
        };

        TranslationGateway {
            registry,
            styles: self.styles,
            adapters: self.adapters,
        }
    }
}

fn validate_text(text: &str) -> Result<(), GatewayError> {
    if text.is_empty() {
        return Err(GatewayError::invalid_input("text must not be empty"));
    }

    let text_len = pricing::text_len(text);
    if text_len > MAX_TEXT_UTF16_UNITS {
        return Err(GatewayError::invalid_input(format!(
            "text exceeds {MAX_TEXT_UTF16_UNITS} characters (got {text_len})"
        )));
    }

    Ok(())
}

fn validate_parameters(request: &TranslationRequest) -> Result<(), GatewayError> {
    if request.target_language.trim().is_empty() {
        return Err(GatewayError::invalid_input("target language is required"));
    }

    if !request.temperature.is_finite() || !(0.0..=1.0).contains(&request.temperature) {
        return Err(GatewayError::invalid_input(format!(
            "temperature must be within [0, 1] (got {})",
            request.temperature
        )));
    }

    if request.max_output_tokens == 0 {
        return Err(GatewayError::invalid_input("max output tokens must be positive"));
    }

    Ok(())
}
