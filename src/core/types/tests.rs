use super::*;
use serde_json::json;

#[test]
fn test_provider_tag_serializes_kebab_case() {
    assert_eq!(
        serde_json::to_value(ProviderTag::OpenSource).expect("serialize"),
        json!("open-source")
    );
    assert_eq!(
        serde_json::from_value::<ProviderTag>(json!("anthropic")).expect("deserialize"),
        ProviderTag::Anthropic
    );
    assert_eq!(ProviderTag::Google.to_string(), "google");
}

#[test]
fn test_provider_tag_declaration_order_is_stable() {
    assert_eq!(
        ProviderTag::ALL,
        [
            ProviderTag::Openai,
            ProviderTag::Anthropic,
            ProviderTag::Google,
            ProviderTag::OpenSource,
        ]
    );
}

#[test]
fn test_translation_request_defaults() {
    let req = TranslationRequest::new("Hello world", "ru", "gpt-4o");

    assert_eq!(req.source_language, "auto");
    assert_eq!(req.style, None);
    assert_eq!(req.temperature, 0.3);
    assert_eq!(req.max_output_tokens, 2000);
    assert!(req.preserve_formatting);
    assert!(req.improve_grammar);
    assert!(!req.show_changes);
}

#[test]
fn test_translation_request_builders_override_defaults() {
    let req = TranslationRequest::new("x", "de", "gemini-pro")
        .with_source_language("en")
        .with_style("physics")
        .with_temperature(0.9)
        .with_max_output_tokens(128)
        .with_flags(false, false, true);

    assert_eq!(req.source_language, "en");
    assert_eq!(req.style.as_deref(), Some("physics"));
    assert_eq!(req.temperature, 0.9);
    assert_eq!(req.max_output_tokens, 128);
    assert!(!req.preserve_formatting);
    assert!(!req.improve_grammar);
    assert!(req.show_changes);
}

#[test]
fn test_usage_total_tokens_derivation() {
    assert_eq!(Usage::split(2, 3).derived_total_tokens(), Some(5));
    assert_eq!(Usage::total(7).derived_total_tokens(), Some(7));
    assert_eq!(Usage::default().derived_total_tokens(), None);

    let input_only = Usage {
        input_tokens: Some(4),
        output_tokens: None,
        total_tokens: None,
    };
    assert_eq!(input_only.derived_total_tokens(), Some(4));
}

#[test]
fn test_adapter_output_omits_missing_usage() {
    let output = AdapterOutput {
        text: "Привет мир".to_string(),
        usage: None,
    };

    let value = serde_json::to_value(&output).expect("serialize");
    assert!(value.get("usage").is_none());
}
