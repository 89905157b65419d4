/*!
 * Bulk translation of ad copies across countries.
 *
 * Every (ad copy, country) pair is translated field by field, the body is
 * proofread, and one translation row is stored with the corrected body and
 * the proofreading score. Pairs run strictly one after another; the first
 * error stops the job and rows stored before it stay in the database.
 */

use log::{debug, info};

use super::progress::ProgressReporter;
use super::proofreader::Proofreader;
use super::translator::{TranslationTarget, Translator};
use crate::database::models::{AdCopy, CountryPrompt, NewTranslation, Translation};
use crate::database::Repository;
use crate::errors::{StoreError, TranslationError};

/// Outcome of a bulk job
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkSummary {
    /// Rows written, in processing order
    pub created: Vec<Translation>,
    /// Pairs skipped because a translation already existed
    pub skipped: usize,
    /// Rows whose proofreading fell back to the default score
    pub degraded: usize,
}

impl BulkSummary {
    pub fn created_count(&self) -> usize {
        self.created.len()
    }

    /// Mean score of the created rows
    pub fn average_score(&self) -> Option<f64> {
        if self.created.is_empty() {
            return None;
        }
        let sum: u32 = self.created.iter().map(|t| u32::from(t.quality_score)).sum();
        Some(f64::from(sum) / self.created.len() as f64)
    }
}

/// Orchestrates translation, proofreading and persistence
#[derive(Debug, Clone)]
pub struct BulkTranslator {
    repository: Repository,
    translator: Translator,
    proofreader: Proofreader,
}

impl BulkTranslator {
    pub fn new(repository: Repository, translator: Translator, proofreader: Proofreader) -> Self {
        Self {
            repository,
            translator,
            proofreader,
        }
    }

    /// Look up countries by code, failing on the first unknown one
    pub async fn resolve_countries(&self, codes: &[String]) -> Result<Vec<CountryPrompt>, StoreError> {
        let mut countries = Vec::with_capacity(codes.len());
        for code in codes {
            let country = self
                .repository
                .get_country_by_code(code)
                .await?
                .ok_or_else(|| StoreError::not_found("country", code))?;
            countries.push(country);
        }
        Ok(countries)
    }

    /// Translate every ad copy into every country
    pub async fn translate(
        &self,
        ads: &[AdCopy],
        countries: &[CountryPrompt],
        progress: &dyn ProgressReporter,
    ) -> Result<BulkSummary, TranslationError> {
        let total = ads.len() * countries.len();
        info!("Translating {} ad copies into {} countries", ads.len(), countries.len());
        progress.start(total);

        let mut summary = BulkSummary::default();
        let mut done = 0;

        for ad in ads {
            for country in countries {
                let (translation, degraded) = self.translate_pair(ad, country).await?;
                if degraded {
                    summary.degraded += 1;
                }
                summary.created.push(translation);

                done += 1;
                progress.advance(done, total, &pair_label(ad, country));
            }
        }

        progress.finish(&format!("{} translations created", summary.created_count()));
        Ok(summary)
    }

    /// Translate all ad copies into one country, skipping existing pairs
    pub async fn translate_all_to(
        &self,
        country: &CountryPrompt,
        ads: &[AdCopy],
        progress: &dyn ProgressReporter,
    ) -> Result<BulkSummary, TranslationError> {
        let total = ads.len();
        info!("Translating {} ad copies into {}", total, country.country_code);
        progress.start(total);

        let mut summary = BulkSummary::default();

        for (index, ad) in ads.iter().enumerate() {
            // Check-then-insert; a concurrent writer can still create a duplicate
            if self.repository.translation_exists(ad.id, &country.country_code).await? {
                debug!("Ad copy {} already translated to {}", ad.id, country.country_code);
                summary.skipped += 1;
            } else {
                let (translation, degraded) = self.translate_pair(ad, country).await?;
                if degraded {
                    summary.degraded += 1;
                }
                summary.created.push(translation);
            }

            progress.advance(index + 1, total, &pair_label(ad, country));
        }

        progress.finish(&format!(
            "{} created, {} skipped",
            summary.created_count(),
            summary.skipped
        ));
        Ok(summary)
    }

    /// Translate, proofread and store one ad copy for one country
    async fn translate_pair(
        &self,
        ad: &AdCopy,
        country: &CountryPrompt,
    ) -> Result<(Translation, bool), TranslationError> {
        let target = TranslationTarget::from(country);

        let headline = self.translator.translate_text(&ad.headline, &target).await?;
        let body = self.translator.translate_text(&ad.body, &target).await?;
        let link_text = match ad.link_text() {
            Some(text) => self.translator.translate_text(text, &target).await?,
            None => String::new(),
        };
        let product = match ad.product() {
            Some(text) => self.translator.translate_text(text, &target).await?,
            None => String::new(),
        };

        let outcome = self
            .proofreader
            .proofread(&ad.body, &body, &country.language)
            .await?;
        let degraded = outcome.is_degraded();
        let review = outcome.into_result();

        let translation = self
            .repository
            .insert_translation(&NewTranslation {
                ad_copy_id: ad.id,
                country_code: country.country_code.clone(),
                language: country.language.clone(),
                headline,
                body: review.corrected,
                link_text,
                product,
                quality_score: review.score,
            })
            .await?;

        debug!(
            "Stored translation {} (ad {}, {}, score {})",
            translation.id, ad.id, country.country_code, translation.quality_score
        );
        Ok((translation, degraded))
    }
}

fn pair_label(ad: &AdCopy, country: &CountryPrompt) -> String {
    format!("{} -> {}", ad.short_headline(30), country.country_code)
}
