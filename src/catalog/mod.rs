use indexmap::IndexMap;

use crate::core::types::{DEFAULT_STYLE, StyleTemplate};

/// Named translation registers keyed by style id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleCatalog {
    styles: IndexMap<String, StyleTemplate>,
}

impl StyleCatalog {
    /// Builds a catalog from custom templates. The default style must be among them.
    pub fn new(templates: Vec<StyleTemplate>) -> Option<Self> {
        let styles: IndexMap<String, StyleTemplate> = templates
            .into_iter()
            .map(|template| (template.id.clone(), template))
            .collect();

        styles
            .contains_key(DEFAULT_STYLE)
            .then_some(Self { styles })
    }

    /// Returns the template for `style_id`, silently falling back to the
    /// academic register when the id is absent or unknown.
    pub fn lookup(&self, style_id: Option<&str>) -> &StyleTemplate {
        style_id
            .and_then(|id| self.styles.get(id.trim()))
            .unwrap_or_else(|| self.default_template())
    }

    pub fn contains(&self, style_id: &str) -> bool {
        self.styles.contains_key(style_id)
    }

    pub fn style_ids(&self) -> Vec<&str> {
        self.styles.keys().map(String::as_str).collect()
    }

    fn default_template(&self) -> &StyleTemplate {
        // `new` and `builtin` both guarantee the default entry exists.
        &self.styles[DEFAULT_STYLE]
    }
}

impl Default for StyleCatalog {
    fn default() -> Self {
        builtin_style_catalog()
    }
}

pub fn builtin_style_catalog() -> StyleCatalog {
    let styles = [
        (
            "academic",
            "You are a professional academic translator. Produce a precise, formal translation suitable for peer-reviewed publication, keeping terminology consistent and citations, formulas and units intact.",
            "Translate the following academic text, maintaining a formal scholarly register:",
        ),
        (
            "physics",
            "You are an expert translator specializing in physics literature. Use standard physics terminology, keep equations, symbols, units and constants exactly as written, and follow the conventions of physics journals in the target language.",
            "Translate the following physics text, preserving all equations, symbols and units:",
        ),
        (
            "chemistry",
            "You are an expert translator specializing in chemistry. Use IUPAC nomenclature in the target language, keep chemical formulas, reaction equations and units unchanged, and preserve experimental details exactly.",
            "Translate the following chemistry text, keeping formulas and compound names accurate:",
        ),
        (
            "biology",
            "You are an expert translator specializing in the life sciences. Keep Latin species names, gene and protein symbols unchanged and use established biological terminology in the target language.",
            "Translate the following biology text, preserving taxonomic names and gene symbols:",
        ),
        (
            "medical",
            "You are an expert medical translator. Use accepted clinical terminology, keep drug names, dosages and lab values exact, and never alter the clinical meaning of a statement.",
            "Translate the following medical text with strict clinical accuracy:",
        ),
        (
            "mathematics",
            "You are an expert translator of mathematical papers. Keep all formulas, notation and theorem numbering unchanged and use the standard mathematical vocabulary of the target language.",
            "Translate the following mathematical text, leaving all notation untouched:",
        ),
        (
            "technical",
            "You are a professional technical translator. Produce clear, unambiguous documentation language, keep identifiers, code fragments, part numbers and units unchanged.",
            "Translate the following technical text clearly and consistently:",
        ),
    ];

    StyleCatalog {
        styles: styles
            .into_iter()
            .map(|(id, system, user)| {
                (
                    id.to_string(),
                    StyleTemplate {
                        id: id.to_string(),
                        system_instruction: system.to_string(),
                        user_instruction: user.to_string(),
                    },
                )
            })
            .collect(),
    }
}
