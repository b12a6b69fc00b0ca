use super::*;
use crate::catalog::StyleCatalog;

fn physics() -> StyleTemplate {
    StyleCatalog::default().lookup(Some("physics")).clone()
}

#[test]
fn test_default_flags_append_formatting_and_grammar_directives() {
    let request = TranslationRequest::new("Hello world", "ru", "gpt-4o");

    let prompts = build_prompts(&request, &physics());

    assert!(prompts.system_prompt.starts_with(&physics().system_instruction));
    assert!(prompts.system_prompt.contains(PRESERVE_FORMATTING_DIRECTIVE));
    assert!(prompts.system_prompt.contains(IMPROVE_GRAMMAR_DIRECTIVE));
    assert!(!prompts.system_prompt.contains(SHOW_CHANGES_DIRECTIVE));
    assert!(
        prompts
            .system_prompt
            .ends_with("Source language: auto\nTarget language: ru")
    );
}

#[test]
fn test_flags_toggle_directives_in_fixed_order() {
    let request =
        TranslationRequest::new("x", "de", "gpt-4o").with_flags(false, true, true);

    let prompts = build_prompts(&request, &physics());

    assert!(!prompts.system_prompt.contains(PRESERVE_FORMATTING_DIRECTIVE));
    let grammar = prompts
        .system_prompt
        .find(IMPROVE_GRAMMAR_DIRECTIVE)
        .expect("grammar directive present");
    let changes = prompts
        .system_prompt
        .find(SHOW_CHANGES_DIRECTIVE)
        .expect("changes directive present");
    assert!(grammar < changes);
}

#[test]
fn test_no_flags_leaves_only_style_and_languages() {
    let style = physics();
    let request = TranslationRequest::new("x", "fr", "gpt-4o")
        .with_source_language("en")
        .with_flags(false, false, false);

    let prompts = build_prompts(&request, &style);

    assert_eq!(
        prompts.system_prompt,
        format!(
            "{}\n\nSource language: en\nTarget language: fr",
            style.system_instruction
        )
    );
}

#[test]
fn test_user_prompt_keeps_source_text_verbatim() {
    let text = "  E = mc^2\n\n\tλ = h/p  ";
    let style = physics();
    let request = TranslationRequest::new(text, "ru", "gpt-4o");

    let prompts = build_prompts(&request, &style);

    assert_eq!(
        prompts.user_prompt,
        format!("{}\n\n{}", style.user_instruction, text)
    );
}

#[test]
fn test_build_is_deterministic() {
    let style = physics();
    let request = TranslationRequest::new("Hello world", "ru", "gpt-4o")
        .with_style("physics")
        .with_flags(true, false, true);

    let first = build_prompts(&request, &style);
    let second = build_prompts(&request.clone(), &style.clone());

    assert_eq!(first, second);
    assert_eq!(
        first.system_prompt.as_bytes(),
        second.system_prompt.as_bytes()
    );
    assert_eq!(first.user_prompt.as_bytes(), second.user_prompt.as_bytes());
}
