use crate::core::types::{PromptPair, StyleTemplate, TranslationRequest};

const PRESERVE_FORMATTING_DIRECTIVE: &str = "Preserve original formatting and structure.";
const IMPROVE_GRAMMAR_DIRECTIVE: &str = "Improve grammar and style while translating.";
const SHOW_CHANGES_DIRECTIVE: &str = "Mark all changes clearly.";

/// Composes the system and user prompts for one request. Pure and
/// deterministic: identical inputs give byte-identical output.
pub fn build_prompts(request: &TranslationRequest, style: &StyleTemplate) -> PromptPair {
    let mut system_prompt = style.system_instruction.clone();

    let directives = [
        (request.preserve_formatting, PRESERVE_FORMATTING_DIRECTIVE),
        (request.improve_grammar, IMPROVE_GRAMMAR_DIRECTIVE),
        (request.show_changes, SHOW_CHANGES_DIRECTIVE),
    ];
    for (enabled, directive) in directives {
        if enabled {
            system_prompt.push_str("\n- ");
            system_prompt.push_str(directive);
        }
    }

    system_prompt.push_str("\n\nSource language: ");
    system_prompt.push_str(&request.source_language);
    system_prompt.push_str("\nTarget language: ");
    system_prompt.push_str(&request.target_language);

    let user_prompt = format!("{}\n\n{}", style.user_instruction, request.text);

    PromptPair {
        system_prompt,
        user_prompt,
    }
}

#[cfg(test)]
mod tests;
