/*!
 * Placeholder-preserving translator.
 *
 * One model call per text: tags are protected, the country's prompts and the
 * translation directive are sent, and the trimmed reply gets its tags back.
 */

use log::{debug, warn};
use std::sync::Arc;

use super::placeholders::PlaceholderMap;
use super::prompts::TranslationPromptBuilder;
use crate::database::models::CountryPrompt;
use crate::errors::ProviderError;
use crate::providers::Provider;

/// Target language and prompt guidance for a translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationTarget {
    /// Language name given to the model, e.g. "Japanese"
    pub language: String,
    /// Role guidance
    pub system_prompt: String,
    /// Task guidance
    pub user_prompt: String,
}

impl TranslationTarget {
    pub fn new(
        language: impl Into<String>,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Self {
        Self {
            language: language.into(),
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
        }
    }
}

impl From<&CountryPrompt> for TranslationTarget {
    fn from(country: &CountryPrompt) -> Self {
        Self::new(&country.language, &country.system_prompt, &country.user_prompt)
    }
}

/// Translator bound to one provider
#[derive(Debug, Clone)]
pub struct Translator {
    provider: Arc<dyn Provider>,
}

impl Translator {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }

    /// Translate `text` into the target language keeping `<tag>` tokens
    ///
    /// Empty input is returned as is without contacting the model.
    pub async fn translate_text(&self, text: &str, target: &TranslationTarget) -> Result<String, ProviderError> {
        if text.is_empty() {
            return Ok(String::new());
        }

        let (placeholders, protected) = PlaceholderMap::protect(text);
        let prompt = TranslationPromptBuilder::new(&target.language)
            .with_system_prompt(&target.system_prompt)
            .with_user_prompt(&target.user_prompt)
            .with_text(&protected)
            .build();

        debug!(
            "Translating {} chars to {} via {}",
            text.chars().count(),
            target.language,
            self.provider.name()
        );
        let reply = self.provider.generate(&prompt).await?;
        let reply = reply.trim();

        let missing = placeholders.missing_sentinels(reply);
        if !missing.is_empty() {
            warn!(
                "Model reply for {} dropped placeholder marker(s): {}",
                target.language,
                missing.join(", ")
            );
        }

        Ok(placeholders.restore(reply))
    }
}
