use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use std::sync::Arc;

use crate::app_config::Config;
use crate::database::models::{
    AdCopy, AdCopyUpdate, CountryPrompt, NewAdCopy, NewCountryPrompt, Translation,
    TranslationFilter, TranslationUpdate,
};
use crate::database::{DatabaseConnection, DatabaseStats, Repository};
use crate::errors::StoreError;
use crate::language_utils;
use crate::providers::{self, Provider};
use crate::translation::{
    BulkSummary, BulkTranslator, ProgressReporter, PromptLab, PromptTestReport, Proofreader,
    Translator, DEFAULT_SAMPLE_TEXT,
};

// @module: Application controller for ad copy administration

/// Optional replacements for the text fields of an ad copy or translation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldEdits {
    pub headline: Option<String>,
    pub body: Option<String>,
    pub link_text: Option<String>,
    pub product: Option<String>,
}

impl FieldEdits {
    pub fn is_empty(&self) -> bool {
        self.headline.is_none() && self.body.is_none() && self.link_text.is_none() && self.product.is_none()
    }

    fn apply(&self, headline: &str, body: &str, link_text: &str, product: &str) -> [String; 4] {
        [
            self.headline.clone().unwrap_or_else(|| headline.to_string()),
            self.body.clone().unwrap_or_else(|| body.to_string()),
            self.link_text.clone().unwrap_or_else(|| link_text.to_string()),
            self.product.clone().unwrap_or_else(|| product.to_string()),
        ]
    }

    /// Merge into the current state of an ad copy
    pub fn apply_to_ad(&self, ad: &AdCopy) -> AdCopyUpdate {
        let [headline, body, link_text, product] =
            self.apply(&ad.headline, &ad.body, &ad.link_text, &ad.product);
        AdCopyUpdate {
            headline,
            body,
            link_text,
            product,
        }
    }

    /// Merge into the current state of a translation
    pub fn apply_to_translation(&self, translation: &Translation) -> TranslationUpdate {
        let [headline, body, link_text, product] = self.apply(
            &translation.headline,
            &translation.body,
            &translation.link_text,
            &translation.product,
        );
        TranslationUpdate {
            headline,
            body,
            link_text,
            product,
        }
    }
}

/// Main application controller
///
/// Owns the configuration, the repository and, once a model action needs
/// it, the provider. Data-only actions never touch the provider, so they
/// work without credentials.
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Record storage
    repository: Repository,
    // @field: Injected provider; built from config on demand when absent
    provider: Option<Arc<dyn Provider>>,
}

impl Controller {
    /// Create a controller with an in-memory database and default configuration
    pub fn new_for_test() -> Result<Self> {
        Ok(Self::with_parts(
            Config::default(),
            Repository::new_in_memory()?,
            None,
        ))
    }

    // @method: Open the configured database
    pub fn with_config(config: Config) -> Result<Self> {
        let db_path = config.resolve_database_path()?;
        debug!("Using database at {:?}", db_path);
        let db = DatabaseConnection::new(&db_path)
            .with_context(|| format!("Failed to open database at {:?}", db_path))?;

        Ok(Self::with_parts(config, Repository::new(db), None))
    }

    // @method: Assemble from explicit parts
    pub fn with_parts(config: Config, repository: Repository, provider: Option<Arc<dyn Provider>>) -> Self {
        Self {
            config,
            repository,
            provider,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    /// Provider for model actions; validates credentials first
    fn provider(&self) -> Result<Arc<dyn Provider>> {
        if let Some(provider) = &self.provider {
            return Ok(provider.clone());
        }

        self.config.validate_provider()?;
        let provider = providers::from_config(&self.config)
            .with_context(|| format!("Failed to create {} provider", self.config.provider.display_name()))?;
        info!("Using {} with model {}", self.config.provider.display_name(), self.config.get_model());
        Ok(provider)
    }

    fn translator_and_proofreader(&self) -> Result<(Translator, Proofreader)> {
        let provider = self.provider()?;
        Ok((
            Translator::new(provider.clone()),
            Proofreader::with_config(provider, &self.config.proofreading),
        ))
    }

    // =========================================================================
    // Ad copies
    // =========================================================================

    pub async fn create_ad_copy(&self, ad: NewAdCopy) -> Result<AdCopy> {
        let created = self.repository.create_ad_copy(&ad).await?;
        info!("Created ad copy {}", created.id);
        Ok(created)
    }

    pub async fn list_ad_copies(&self) -> Result<Vec<AdCopy>> {
        Ok(self.repository.list_ad_copies().await?)
    }

    pub async fn get_ad_copy(&self, id: i64) -> Result<AdCopy> {
        self.repository
            .get_ad_copy(id)
            .await?
            .ok_or_else(|| StoreError::not_found("ad copy", id).into())
    }

    /// Apply the given field edits to an ad copy
    pub async fn update_ad_copy(&self, id: i64, edits: &FieldEdits) -> Result<AdCopy> {
        let current = self.get_ad_copy(id).await?;
        let updated = self.repository.update_ad_copy(id, &edits.apply_to_ad(&current)).await?;
        info!("Updated ad copy {}", id);
        Ok(updated)
    }

    pub async fn delete_ad_copy(&self, id: i64) -> Result<()> {
        self.repository.delete_ad_copy(id).await?;
        info!("Deleted ad copy {}", id);
        Ok(())
    }

    // =========================================================================
    // Countries
    // =========================================================================

    /// Add a country; the language may be a name or an ISO code
    pub async fn add_country(
        &self,
        code: &str,
        language: &str,
        system_prompt: Option<String>,
        user_prompt: Option<String>,
    ) -> Result<CountryPrompt> {
        let language = match language_utils::resolve_language_name(language) {
            Ok(name) => name,
            Err(_) => {
                warn!("Language '{}' is not a known ISO 639 language, storing as given", language.trim());
                language.trim().to_string()
            }
        };

        let system_prompt = system_prompt
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| self.config.default_system_prompt.clone());

        let country = NewCountryPrompt::new(code, language)
            .system_prompt(system_prompt)
            .user_prompt(user_prompt.unwrap_or_default());

        let created = self.repository.create_country(&country).await?;
        info!("Added country {} ({})", created.country_code, created.language);
        Ok(created)
    }

    pub async fn list_countries(&self) -> Result<Vec<CountryPrompt>> {
        Ok(self.repository.list_countries().await?)
    }

    /// Look up a country by code
    pub async fn get_country(&self, code: &str) -> Result<CountryPrompt> {
        self.repository
            .get_country_by_code(code)
            .await?
            .ok_or_else(|| StoreError::not_found("country", code.trim().to_uppercase()).into())
    }

    pub async fn delete_country(&self, code: &str) -> Result<()> {
        let country = self.get_country(code).await?;
        self.repository.delete_country(country.id).await?;
        info!("Deleted country {}", country.country_code);
        Ok(())
    }

    // =========================================================================
    // Translations
    // =========================================================================

    pub async fn list_translations(&self, filter: &TranslationFilter) -> Result<Vec<Translation>> {
        Ok(self.repository.list_translations(filter).await?)
    }

    /// Apply the given field edits to a translation; the score is kept
    pub async fn update_translation(&self, id: i64, edits: &FieldEdits) -> Result<Translation> {
        let current = self
            .repository
            .get_translation(id)
            .await?
            .ok_or_else(|| StoreError::not_found("translation", id))?;
        let updated = self
            .repository
            .update_translation(id, &edits.apply_to_translation(&current))
            .await?;
        info!("Updated translation {}", id);
        Ok(updated)
    }

    pub async fn delete_translation(&self, id: i64) -> Result<()> {
        self.repository.delete_translation(id).await?;
        info!("Deleted translation {}", id);
        Ok(())
    }

    // =========================================================================
    // Model actions
    // =========================================================================

    /// Translate the selected ad copies into the selected countries
    pub async fn translate(
        &self,
        ad_ids: &[i64],
        country_codes: &[String],
        progress: &dyn ProgressReporter,
    ) -> Result<BulkSummary> {
        if ad_ids.is_empty() || country_codes.is_empty() {
            return Err(anyhow!("Select at least one ad copy and one country"));
        }

        let (translator, proofreader) = self.translator_and_proofreader()?;
        let bulk = BulkTranslator::new(self.repository.clone(), translator, proofreader);

        let ads = self.repository.get_ad_copies(ad_ids).await?;
        let countries = bulk.resolve_countries(country_codes).await?;

        let summary = bulk
            .translate(&ads, &countries, progress)
            .await
            .context("Bulk translation stopped")?;
        info!(
            "Created {} translations ({} auto-approved)",
            summary.created_count(),
            summary.degraded
        );
        Ok(summary)
    }

    /// Translate every ad copy into one country, skipping existing pairs
    pub async fn translate_all(&self, country_code: &str, progress: &dyn ProgressReporter) -> Result<BulkSummary> {
        let country = self.get_country(country_code).await?;
        let (translator, proofreader) = self.translator_and_proofreader()?;
        let bulk = BulkTranslator::new(self.repository.clone(), translator, proofreader);

        let ads = self.repository.list_ad_copies().await?;
        if ads.is_empty() {
            warn!("No ad copies to translate");
        }

        let summary = bulk
            .translate_all_to(&country, &ads, progress)
            .await
            .with_context(|| format!("Translation to {} stopped", country.country_code))?;
        info!(
            "{}: {} created, {} already translated",
            country.country_code,
            summary.created_count(),
            summary.skipped
        );
        Ok(summary)
    }

    /// Test prompts for a country, falling back to its live prompts
    ///
    /// With `save`, the tested prompts replace the live ones afterwards.
    pub async fn test_prompts(
        &self,
        country_code: &str,
        system_prompt: Option<String>,
        user_prompt: Option<String>,
        sample_text: Option<String>,
        save: bool,
    ) -> Result<(PromptTestReport, Option<CountryPrompt>)> {
        let country = self.get_country(country_code).await?;
        let (translator, proofreader) = self.translator_and_proofreader()?;
        let lab = PromptLab::new(self.repository.clone(), translator, proofreader);

        let system_prompt = system_prompt.unwrap_or_else(|| country.system_prompt.clone());
        let user_prompt = user_prompt.unwrap_or_else(|| country.user_prompt.clone());
        let sample_text = sample_text
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SAMPLE_TEXT.to_string());

        let report = lab.run(&country, &system_prompt, &user_prompt, &sample_text).await?;

        let promoted = if save {
            Some(lab.promote(country.id, &system_prompt, &user_prompt).await?)
        } else {
            None
        };

        Ok((report, promoted))
    }

    // =========================================================================
    // Overview
    // =========================================================================

    pub async fn stats(&self) -> Result<DatabaseStats> {
        Ok(self.repository.stats().await?)
    }

    /// Send a short request to the configured provider and report its name
    pub async fn check_provider(&self) -> Result<String> {
        let provider = self.provider()?;
        provider
            .test_connection()
            .await
            .with_context(|| format!("{} did not answer", provider.name()))?;
        info!("{} answered the connection check", provider.name());
        Ok(provider.name().to_string())
    }
}
