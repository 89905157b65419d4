/*!
 * Prompt lab: try candidate prompts for a country on sample text.
 *
 * A run translates and proofreads the sample without storing anything;
 * promoting writes the candidate prompts into the live country row.
 */

use log::info;

use super::proofreader::Proofreader;
use super::translator::{TranslationTarget, Translator};
use crate::database::models::{CountryPrompt, QualityBand};
use crate::database::Repository;
use crate::errors::{StoreError, TranslationError};

/// Sample used when none is given
pub const DEFAULT_SAMPLE_TEXT: &str = "Get <discount>% off on <product> today! Limited time offer.";

/// Result of one prompt test
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTestReport {
    pub country_code: String,
    pub language: String,
    /// Sample text as given
    pub original: String,
    /// Proofread (corrected) translation
    pub translation: String,
    pub score: u8,
    pub band: QualityBand,
    pub feedback: String,
    /// Proofreading fell back to the default score
    pub degraded: bool,
}

/// Runs prompt experiments for countries
#[derive(Debug, Clone)]
pub struct PromptLab {
    repository: Repository,
    translator: Translator,
    proofreader: Proofreader,
}

impl PromptLab {
    pub fn new(repository: Repository, translator: Translator, proofreader: Proofreader) -> Self {
        Self {
            repository,
            translator,
            proofreader,
        }
    }

    /// Translate and proofread `sample_text` with candidate prompts
    pub async fn run(
        &self,
        country: &CountryPrompt,
        system_prompt: &str,
        user_prompt: &str,
        sample_text: &str,
    ) -> Result<PromptTestReport, TranslationError> {
        let target = TranslationTarget::new(&country.language, system_prompt, user_prompt);

        let translated = self.translator.translate_text(sample_text, &target).await?;
        let outcome = self
            .proofreader
            .proofread(sample_text, &translated, &country.language)
            .await?;
        let degraded = outcome.is_degraded();
        let review = outcome.into_result();

        Ok(PromptTestReport {
            country_code: country.country_code.clone(),
            language: country.language.clone(),
            original: sample_text.to_string(),
            translation: review.corrected,
            score: review.score,
            band: QualityBand::from_score(review.score),
            feedback: review.feedback,
            degraded,
        })
    }

    /// Make the tested prompts the live prompts of a country
    pub async fn promote(
        &self,
        country_id: i64,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<CountryPrompt, StoreError> {
        let updated = self
            .repository
            .update_country_prompts(country_id, system_prompt, user_prompt)
            .await?;
        info!("Saved tested prompts for {}", updated.country_code);
        Ok(updated)
    }
}
