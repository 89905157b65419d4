//! Language utilities for country configuration
//!
//! Countries store the target language as an English name ("French"), since
//! that is what goes into the prompt. These helpers accept either a name or
//! an ISO 639-1 / 639-3 code and resolve it to the English name.

use anyhow::{Result, anyhow};
use isolang::Language;

/// Look up a language by ISO 639-1 (2-letter) or ISO 639-3 (3-letter) code
pub fn language_from_code(code: &str) -> Option<Language> {
    let normalized_code = code.trim().to_lowercase();

    match normalized_code.len() {
        2 => Language::from_639_1(&normalized_code),
        3 => Language::from_639_3(&normalized_code),
        _ => None,
    }
}

/// Look up a language by its English name, ignoring the case of the input
pub fn language_from_name(name: &str) -> Option<Language> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return None;
    }

    Language::from_name(trimmed).or_else(|| {
        // isolang names are capitalized ("French")
        let mut chars = trimmed.chars();
        let first = chars.next()?;
        let capitalized: String = first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect();
        Language::from_name(&capitalized)
    })
}

/// English name of a language without ISO qualifiers
///
/// isolang names some languages "Modern Greek (1453-)" or
/// "Swahili (macrolanguage)"; prompts only need the plain name.
pub fn prompt_name(language: Language) -> String {
    let name = language.to_name();
    match name.find(" (") {
        Some(index) => name[..index].trim().to_string(),
        None => name.to_string(),
    }
}

/// Resolve a language name or code to its English name
pub fn resolve_language_name(input: &str) -> Result<String> {
    language_from_name(input)
        .or_else(|| language_from_code(input))
        .map(prompt_name)
        .ok_or_else(|| anyhow!("Unknown language: {}", input.trim()))
}
