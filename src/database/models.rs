/*!
 * Database entity models and DTOs.
 *
 * These structures map directly to database tables and provide
 * type-safe access to persisted data.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::StoreError;

/// Quality band derived from a proofreading score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityBand {
    /// Score of 80 or more
    High,
    /// Score from 60 to 79
    Medium,
    /// Score below 60
    Low,
}

impl QualityBand {
    /// Classify a 0-100 score
    pub fn from_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => QualityBand::High,
            60..=79 => QualityBand::Medium,
            _ => QualityBand::Low,
        }
    }
}

impl fmt::Display for QualityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityBand::High => write!(f, "high"),
            QualityBand::Medium => write!(f, "medium"),
            QualityBand::Low => write!(f, "low"),
        }
    }
}

/// Current timestamp in the format stored by every table.
///
/// Fixed-width so that text ordering matches time ordering.
pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

/// Treat empty optional fields as absent; whitespace still counts as text
fn optional_text(value: &str) -> Option<&str> {
    if value.is_empty() { None } else { Some(value) }
}

/// Reusable ad copy template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdCopy {
    /// Row identifier
    pub id: i64,
    /// Attention-grabbing main text
    pub headline: String,
    /// Main ad content, may embed `<placeholder>` tokens
    pub body: String,
    /// Call-to-action text, empty when absent
    pub link_text: String,
    /// Product or service name, empty when absent
    pub product: String,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

impl AdCopy {
    /// Link text if the ad has one
    pub fn link_text(&self) -> Option<&str> {
        optional_text(&self.link_text)
    }

    /// Product name if the ad has one
    pub fn product(&self) -> Option<&str> {
        optional_text(&self.product)
    }

    /// Headline shortened for listings
    pub fn short_headline(&self, max_chars: usize) -> String {
        truncate_chars(&self.headline, max_chars)
    }
}

/// Fields for creating or replacing an ad copy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewAdCopy {
    pub headline: String,
    pub body: String,
    #[serde(default)]
    pub link_text: String,
    #[serde(default)]
    pub product: String,
}

impl NewAdCopy {
    /// Build an ad copy with only the required fields
    pub fn new(headline: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            headline: headline.into(),
            body: body.into(),
            ..Default::default()
        }
    }

    /// Set the link text
    pub fn link_text(mut self, link_text: impl Into<String>) -> Self {
        self.link_text = link_text.into();
        self
    }

    /// Set the product name
    pub fn product(mut self, product: impl Into<String>) -> Self {
        self.product = product.into();
        self
    }

    /// Headline and body are required
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.headline.trim().is_empty() {
            return Err(StoreError::invalid("ad copy", "headline is required"));
        }
        if self.body.trim().is_empty() {
            return Err(StoreError::invalid("ad copy", "body is required"));
        }
        Ok(())
    }
}

/// Editable fields of an ad copy; every field is replaced on update
pub type AdCopyUpdate = NewAdCopy;

/// Per-market translation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryPrompt {
    /// Row identifier
    pub id: i64,
    /// Two-letter upper-case country code
    pub country_code: String,
    /// Target language name, e.g. "Japanese"
    pub language: String,
    /// Role guidance for the model
    pub system_prompt: String,
    /// Task-specific guidance for the model
    pub user_prompt: String,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

/// Fields for adding a country
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewCountryPrompt {
    pub country_code: String,
    pub language: String,
    pub system_prompt: String,
    pub user_prompt: String,
}

impl NewCountryPrompt {
    /// Build a country entry; the code is normalized to upper case
    pub fn new(country_code: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            country_code: normalize_country_code(&country_code.into()),
            language: language.into().trim().to_string(),
            ..Default::default()
        }
    }

    /// Set the system prompt
    pub fn system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    /// Set the user prompt
    pub fn user_prompt(mut self, user_prompt: impl Into<String>) -> Self {
        self.user_prompt = user_prompt.into();
        self
    }

    /// Country code must be two ASCII letters and language is required
    pub fn validate(&self) -> Result<(), StoreError> {
        validate_country_code(&self.country_code)?;
        if self.language.trim().is_empty() {
            return Err(StoreError::invalid("country", "language is required"));
        }
        Ok(())
    }
}

/// Upper-case and trim a country code
pub fn normalize_country_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Check a (normalized) two-letter country code
pub fn validate_country_code(code: &str) -> Result<(), StoreError> {
    if code.len() == 2 && code.chars().all(|c| c.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(StoreError::invalid(
            "country",
            format!("country code must be two letters, got '{}'", code),
        ))
    }
}

/// Translated ad copy for one country
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    /// Row identifier
    pub id: i64,
    /// Source ad copy
    pub ad_copy_id: i64,
    /// Target country code
    pub country_code: String,
    /// Target language name
    pub language: String,
    pub headline: String,
    pub body: String,
    pub link_text: String,
    pub product: String,
    /// Proofreading score (0-100)
    pub quality_score: u8,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

impl Translation {
    /// Quality band of this translation
    pub fn quality_band(&self) -> QualityBand {
        QualityBand::from_score(self.quality_score)
    }
}

/// Fields for inserting a translation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTranslation {
    pub ad_copy_id: i64,
    pub country_code: String,
    pub language: String,
    pub headline: String,
    pub body: String,
    pub link_text: String,
    pub product: String,
    pub quality_score: u8,
}

impl NewTranslation {
    /// Scores are percentages
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.quality_score > 100 {
            return Err(StoreError::invalid(
                "translation",
                format!("quality score {} is above 100", self.quality_score),
            ));
        }
        validate_country_code(&self.country_code)
    }
}

/// Editable fields of a translation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranslationUpdate {
    pub headline: String,
    pub body: String,
    pub link_text: String,
    pub product: String,
}

impl From<&Translation> for TranslationUpdate {
    fn from(translation: &Translation) -> Self {
        Self {
            headline: translation.headline.clone(),
            body: translation.body.clone(),
            link_text: translation.link_text.clone(),
            product: translation.product.clone(),
        }
    }
}

impl From<&AdCopy> for NewAdCopy {
    fn from(ad: &AdCopy) -> Self {
        Self {
            headline: ad.headline.clone(),
            body: ad.body.clone(),
            link_text: ad.link_text.clone(),
            product: ad.product.clone(),
        }
    }
}

/// Query filters for listing translations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationFilter {
    /// Only this country
    pub country_code: Option<String>,
    /// Only translations of this ad copy
    pub ad_copy_id: Option<i64>,
    /// Minimum quality score (inclusive)
    pub min_quality: u8,
}

/// Cut a string to at most `max_chars` characters, appending "..." when cut
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut)
}
