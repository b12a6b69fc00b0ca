use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::*;
use crate::config::ProviderCredentials;

fn registry_with(providers: &[ProviderTag]) -> ModelRegistry {
    ModelRegistry::with_builtin_models(Arc::new(ProviderCredentials::with(
        providers.iter().copied(),
    )))
}

#[test]
fn test_resolve_known_model_returns_descriptor() {
    let registry = registry_with(&[]);

    let descriptor = registry.resolve("gpt-4o").expect("gpt-4o is registered");

    assert_eq!(descriptor.provider, ProviderTag::Openai);
    assert_eq!(descriptor.wire_model, "gpt-4");
    assert_eq!(descriptor.cost.input_cost_per_k_tokens, 0.03);
    assert_eq!(descriptor.cost.output_cost_per_k_tokens, 0.06);
}

#[test]
fn test_resolve_unknown_model_fails_regardless_of_credentials() {
    let registry = registry_with(&ProviderTag::ALL);

    let error = registry
        .resolve("unknown-model-xyz")
        .expect_err("unknown model should fail");

    assert_eq!(
        error,
        GatewayError::UnknownModel {
            model: "unknown-model-xyz".to_string()
        }
    );
}

#[test]
fn test_available_models_follow_declaration_order() {
    let registry = registry_with(&[ProviderTag::OpenSource, ProviderTag::Openai]);

    assert_eq!(
        registry.available_models(),
        vec!["gpt-4o", "gpt-3.5-turbo", "llama-3-70b", "mixtral-8x7b"]
    );
}

#[test]
fn test_available_models_empty_without_credentials() {
    let registry = registry_with(&[]);

    assert!(registry.available_models().is_empty());
    assert!(!registry.is_available("gpt-4o"));
    assert!(!registry.is_available("unknown-model-xyz"));
}

#[test]
fn test_every_builtin_model_has_single_provider_and_positive_costs() {
    let models = builtin_models();
    let mut ids: Vec<&str> = models.iter().map(|model| model.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), models.len());

    for model in &models {
        assert!(model.cost.input_cost_per_k_tokens > 0.0, "{}", model.id);
        assert!(model.cost.output_cost_per_k_tokens > 0.0, "{}", model.id);
    }
}

#[test]
fn test_duplicate_ids_keep_first_declaration() {
    let mut models = builtin_models();
    let mut duplicate = models[0].clone();
    duplicate.wire_model = "shadowed".to_string();
    models.push(duplicate);

    let registry = ModelRegistry::new(models, Arc::new(ProviderCredentials::default()));

    assert_eq!(
        registry.resolve("gpt-4o").expect("registered").wire_model,
        "gpt-4"
    );
    assert_eq!(registry.descriptors().count(), builtin_models().len());
}

struct ToggleCredentials {
    anthropic: AtomicBool,
}

impl CredentialSource for ToggleCredentials {
    fn has_credential(&self, provider: ProviderTag) -> bool {
        provider == ProviderTag::Anthropic && self.anthropic.load(Ordering::SeqCst)
    }
}

#[test]
fn test_availability_is_reevaluated_per_query() {
    let credentials = Arc::new(ToggleCredentials {
        anthropic: AtomicBool::new(false),
    });
    let registry = ModelRegistry::with_builtin_models(credentials.clone());

    assert!(registry.available_models().is_empty());

    credentials.anthropic.store(true, Ordering::SeqCst);

    assert_eq!(
        registry.available_models(),
        vec!["claude-3-opus", "claude-3-sonnet"]
    );
}
