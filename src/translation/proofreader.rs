/*!
 * Translation proofreader.
 *
 * Asks the model to score a translation and suggest a corrected version.
 * Replies are parsed strictly; anything unusable degrades to the configured
 * fallback (score 85, the translation unchanged, "Auto-approved") instead of
 * failing the whole job.
 */

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::sync::Arc;

use super::prompts::build_proofread_prompt;
use crate::app_config::ProofreadingConfig;
use crate::database::models::QualityBand;
use crate::errors::ProviderError;
use crate::providers::Provider;

/// Fenced ```json block in a model reply
static FENCED_JSON_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```json\s*(.*?)```").expect("Invalid fenced JSON regex")
});

/// Raw reply as requested from the model
#[derive(Debug, Clone, Deserialize)]
pub struct ProofreadResponse {
    pub score: i64,
    pub corrected: String,
    #[serde(default)]
    pub feedback: String,
}

/// Score, corrected text and feedback for one translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofreadResult {
    /// Quality score (0-100)
    pub score: u8,
    /// Corrected translation
    pub corrected: String,
    /// Short reviewer feedback
    pub feedback: String,
}

impl ProofreadResult {
    pub fn band(&self) -> QualityBand {
        QualityBand::from_score(self.score)
    }
}

/// What the proofreader made of a reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProofreadOutcome {
    /// The model returned a valid review
    Reviewed(ProofreadResult),
    /// The reply was unusable and the fallback applies
    Degraded {
        reason: String,
        fallback: ProofreadResult,
    },
}

impl ProofreadOutcome {
    /// The result to persist, reviewed or fallback
    pub fn result(&self) -> &ProofreadResult {
        match self {
            Self::Reviewed(result) => result,
            Self::Degraded { fallback, .. } => fallback,
        }
    }

    pub fn into_result(self) -> ProofreadResult {
        match self {
            Self::Reviewed(result) => result,
            Self::Degraded { fallback, .. } => fallback,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}

/// Locate the JSON object in a model reply
///
/// A fenced ```json block wins; otherwise the span from the first `{` to the
/// last `}` is taken.
pub fn extract_json(text: &str) -> Option<&str> {
    if let Some(caps) = FENCED_JSON_REGEX.captures(text) {
        if let Some(inner) = caps.get(1) {
            return Some(inner.as_str().trim());
        }
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Parse and validate a proofreading reply
pub fn parse_proofread_reply(reply: &str) -> Result<ProofreadResult, String> {
    let json = extract_json(reply).ok_or_else(|| "no JSON object in reply".to_string())?;
    let response: ProofreadResponse =
        serde_json::from_str(json).map_err(|e| format!("malformed JSON: {}", e))?;

    let score = u8::try_from(response.score)
        .ok()
        .filter(|s| *s <= 100)
        .ok_or_else(|| format!("score {} outside 0-100", response.score))?;

    if response.corrected.trim().is_empty() {
        return Err("corrected text is empty".to_string());
    }

    Ok(ProofreadResult {
        score,
        corrected: response.corrected,
        feedback: response.feedback,
    })
}

/// Proofreader bound to one provider
#[derive(Debug, Clone)]
pub struct Proofreader {
    provider: Arc<dyn Provider>,
    fallback_score: u8,
    fallback_feedback: String,
}

impl Proofreader {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self::with_config(provider, &ProofreadingConfig::default())
    }

    /// Proofreader with fallback values from the configuration
    pub fn with_config(provider: Arc<dyn Provider>, config: &ProofreadingConfig) -> Self {
        Self {
            provider,
            fallback_score: config.fallback_score.min(100),
            fallback_feedback: config.fallback_feedback.clone(),
        }
    }

    fn fallback(&self, translation: &str) -> ProofreadResult {
        ProofreadResult {
            score: self.fallback_score,
            corrected: translation.to_string(),
            feedback: self.fallback_feedback.clone(),
        }
    }

    /// Review `translation` of `original` in `language`
    ///
    /// Transport and API failures are errors; unusable replies are `Degraded`.
    pub async fn proofread(
        &self,
        original: &str,
        translation: &str,
        language: &str,
    ) -> Result<ProofreadOutcome, ProviderError> {
        let prompt = build_proofread_prompt(original, translation, language);
        let reply = self.provider.generate(&prompt).await?;

        match parse_proofread_reply(&reply) {
            Ok(result) => {
                debug!("Proofread {} translation: score {}", language, result.score);
                Ok(ProofreadOutcome::Reviewed(result))
            }
            Err(reason) => {
                warn!("Proofreading reply unusable ({}), auto-approving", reason);
                Ok(ProofreadOutcome::Degraded {
                    reason,
                    fallback: self.fallback(translation),
                })
            }
        }
    }
}
