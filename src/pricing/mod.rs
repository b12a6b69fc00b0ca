use crate::core::types::{CostTable, PromptPair, Usage};

/// Coarse characters-per-token ratio used whenever a provider does not report
/// an input/output split.
pub const CHARS_PER_TOKEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    ProviderReported,
    /// Provider reported a combined count only; the split is estimated.
    Apportioned,
    Estimated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenAccount {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
    pub source: TokenSource,
}

/// Length in UTF-16 code units, the unit request limits are expressed in.
pub fn text_len(text: &str) -> usize {
    text.encode_utf16().count()
}

pub fn estimate_tokens(text_len: usize) -> u64 {
    (text_len / CHARS_PER_TOKEN) as u64
}

/// Settles the input/output token counts for one call, preferring what the
/// provider reported and falling back to the characters-per-token estimate.
pub fn account_tokens(
    prompts: &PromptPair,
    translated_text: &str,
    usage: Option<&Usage>,
) -> TokenAccount {
    let estimated_input =
        estimate_tokens(text_len(&prompts.system_prompt) + text_len(&prompts.user_prompt));
    let estimated_output = estimate_tokens(text_len(translated_text));

    if let Some(usage) = usage {
        if let (Some(input_tokens), Some(output_tokens)) = (usage.input_tokens, usage.output_tokens)
        {
            return TokenAccount {
                input_tokens,
                output_tokens,
                total_tokens: usage
                    .derived_total_tokens()
                    .unwrap_or(input_tokens + output_tokens),
                source: TokenSource::ProviderReported,
            };
        }

        if let Some(total_tokens) = usage.derived_total_tokens() {
            let (input_tokens, output_tokens) =
                apportion(total_tokens, estimated_input, estimated_output);
            return TokenAccount {
                input_tokens,
                output_tokens,
                total_tokens,
                source: TokenSource::Apportioned,
            };
        }
    }

    TokenAccount {
        input_tokens: estimated_input,
        output_tokens: estimated_output,
        total_tokens: estimated_input + estimated_output,
        source: TokenSource::Estimated,
    }
}

/// Splits `total` in proportion to the estimated input/output weights.
pub fn apportion(total: u64, estimated_input: u64, estimated_output: u64) -> (u64, u64) {
    let weight = u128::from(estimated_input) + u128::from(estimated_output);
    if weight == 0 {
        return (total, 0);
    }

    let output = (u128::from(total) * u128::from(estimated_output) / weight) as u64;
    (total - output, output)
}

/// USD cost of a call given per-thousand-token rates.
pub fn compute_cost(table: &CostTable, input_tokens: u64, output_tokens: u64) -> f64 {
    (input_tokens as f64 * table.input_cost_per_k_tokens
        + output_tokens as f64 * table.output_cost_per_k_tokens)
        / 1000.0
}

pub fn format_cost(cost: f64) -> String {
    format!("{cost:.4}")
}
