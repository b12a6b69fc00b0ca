use serde::{Deserialize, Serialize};

pub const DEFAULT_STYLE: &str = "academic";
pub const DEFAULT_SOURCE_LANGUAGE: &str = "auto";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 2000;
pub const MAX_TEXT_UTF16_UNITS: usize = 10_000;

/// Upstream LLM vendor family a model is served by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderTag {
    Openai,
    Anthropic,
    Google,
    OpenSource,
}

impl ProviderTag {
    /// Declaration order used for availability listings.
    pub const ALL: [ProviderTag; 4] = [
        ProviderTag::Openai,
        ProviderTag::Anthropic,
        ProviderTag::Google,
        ProviderTag::OpenSource,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Openai => "openai",
            Self::Anthropic => "anthropic",
            Self::Google => "google",
            Self::OpenSource => "open-source",
        }
    }
}

impl std::fmt::Display for ProviderTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable translation request after boundary defaults have been applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranslationRequest {
    pub text: String,
    pub source_language: String,
    pub target_language: String,
    pub model: String,
    pub style: Option<String>,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub preserve_formatting: bool,
    pub improve_grammar: bool,
    pub show_changes: bool,
}

impl TranslationRequest {
    /// Builds a request with every optional field at its default.
    pub fn new(
        text: impl Into<String>,
        target_language: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source_language: DEFAULT_SOURCE_LANGUAGE.to_string(),
            target_language: target_language.into(),
            model: model.into(),
            style: None,
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            preserve_formatting: true,
            improve_grammar: true,
            show_changes: false,
        }
    }

    pub fn with_source_language(mut self, source_language: impl Into<String>) -> Self {
        self.source_language = source_language.into();
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    pub fn with_flags(
        mut self,
        preserve_formatting: bool,
        improve_grammar: bool,
        show_changes: bool,
    ) -> Self {
        self.preserve_formatting = preserve_formatting;
        self.improve_grammar = improve_grammar;
        self.show_changes = show_changes;
        self
    }
}

/// Price per thousand tokens, in USD.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CostTable {
    pub input_cost_per_k_tokens: f64,
    pub output_cost_per_k_tokens: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelDescriptor {
    pub id: String,
    pub provider: ProviderTag,
    pub wire_model: String,
    pub cost: CostTable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleTemplate {
    pub id: String,
    pub system_instruction: String,
    pub user_instruction: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PromptPair {
    pub system_prompt: String,
    pub user_prompt: String,
}

/// Normalized input handed to every provider adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdapterRequest {
    pub wire_model: String,
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Usage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u64>,
}

impl Usage {
    pub fn split(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens: Some(input_tokens),
            output_tokens: Some(output_tokens),
            total_tokens: Some(input_tokens + output_tokens),
        }
    }

    pub fn total(total_tokens: u64) -> Self {
        Self {
            input_tokens: None,
            output_tokens: None,
            total_tokens: Some(total_tokens),
        }
    }

    /// Combined token count, if the provider reported anything at all.
    pub fn derived_total_tokens(&self) -> Option<u64> {
        match (self.total_tokens, self.input_tokens, self.output_tokens) {
            (Some(total), _, _) => Some(total),
            (None, None, None) => None,
            (None, input, output) => Some(input.unwrap_or(0) + output.unwrap_or(0)),
        }
    }
}

/// What an adapter hands back: the text plus an authoritative usage report
/// when the provider supplies one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdapterOutput {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranslationResult {
    pub translated_text: String,
    pub tokens_used: u64,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cost: f64,
    pub provider: ProviderTag,
    pub wire_model: String,
}

/// Upper-bound cost of a request, computed before any provider call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CostEstimate {
    pub provider: ProviderTag,
    pub wire_model: String,
    pub input_tokens: u64,
    pub max_output_tokens: u64,
    pub input_cost: f64,
    pub max_cost: f64,
}

#[cfg(test)]
mod tests;
