use std::sync::Arc;

use indexmap::IndexMap;

use crate::core::error::GatewayError;
use crate::core::traits::CredentialSource;
use crate::core::types::{CostTable, ModelDescriptor, ProviderTag};

/// Static model table plus the credential source that gates availability.
#[derive(Clone)]
pub struct ModelRegistry {
    models: IndexMap<String, ModelDescriptor>,
    credentials: Arc<dyn CredentialSource>,
}

impl ModelRegistry {
    pub fn new(models: Vec<ModelDescriptor>, credentials: Arc<dyn CredentialSource>) -> Self {
        let mut table = IndexMap::new();
        for model in models {
            // First declaration wins so ordering stays stable.
            table.entry(model.id.clone()).or_insert(model);
        }

        Self {
            models: table,
            credentials,
        }
    }

    pub fn with_builtin_models(credentials: Arc<dyn CredentialSource>) -> Self {
        Self::new(builtin_models(), credentials)
    }

    /// Resolves a public model id regardless of credential state.
    pub fn resolve(&self, model_id: &str) -> Result<&ModelDescriptor, GatewayError> {
        self.models
            .get(model_id)
            .ok_or_else(|| GatewayError::UnknownModel {
                model: model_id.to_string(),
            })
    }

    /// Model ids whose provider currently has a credential, grouped by
    /// provider declaration order and then model declaration order.
    pub fn available_models(&self) -> Vec<String> {
        let mut available = Vec::new();
        for provider in ProviderTag::ALL {
            if !self.credentials.has_credential(provider) {
                continue;
            }

            available.extend(
                self.models
                    .values()
                    .filter(|model| model.provider == provider)
                    .map(|model| model.id.clone()),
            );
        }
        available
    }

    pub fn is_available(&self, model_id: &str) -> bool {
        self.models
            .get(model_id)
            .is_some_and(|model| self.credentials.has_credential(model.provider))
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &ModelDescriptor> {
        self.models.values()
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("models", &self.models.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

pub fn builtin_models() -> Vec<ModelDescriptor> {
    let entries = [
        ("gpt-4o", ProviderTag::Openai, "gpt-4", 0.03, 0.06),
        (
            "gpt-3.5-turbo",
            ProviderTag::Openai,
            "gpt-3.5-turbo",
            0.0015,
            0.002,
        ),
        (
            "claude-3-opus",
            ProviderTag::Anthropic,
            "claude-3-opus-20240229",
            0.015,
            0.075,
        ),
        (
            "claude-3-sonnet",
            ProviderTag::Anthropic,
            "claude-3-sonnet-20240229",
            0.003,
            0.015,
        ),
        (
            "gemini-pro",
            ProviderTag::Google,
            "gemini-pro",
            0.00025,
            0.0005,
        ),
        (
            "llama-3-70b",
            ProviderTag::OpenSource,
            "meta-llama/Llama-3-70b-chat-hf",
            0.0009,
            0.0009,
        ),
        (
            "mixtral-8x7b",
            ProviderTag::OpenSource,
            "mistralai/Mixtral-8x7B-Instruct-v0.1",
            0.0006,
            0.0006,
        ),
    ];

    entries
        .into_iter()
        .map(|(id, provider, wire_model, input, output)| ModelDescriptor {
            id: id.to_string(),
            provider,
            wire_model: wire_model.to_string(),
            cost: CostTable {
                input_cost_per_k_tokens: input,
                output_cost_per_k_tokens: output,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests;
