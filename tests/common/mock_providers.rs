/*!
 * Mock providers shared by the integration tests
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use adsync::errors::ProviderError;
use adsync::providers::Provider;

/// Marker that only appears in proofreading prompts
const PROOFREAD_MARKER: &str = "translation quality expert";

/// Provider that behaves like a cooperative model
///
/// Translation prompts get their text block back with a language prefix,
/// proofreading prompts get a valid JSON review with a fixed score. An
/// optional call limit makes every later request fail.
#[derive(Debug, Clone)]
pub struct RoutingProvider {
    score: u8,
    fail_after: Option<usize>,
    calls: Arc<AtomicUsize>,
    translate_calls: Arc<AtomicUsize>,
    proofread_calls: Arc<AtomicUsize>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl RoutingProvider {
    pub fn new(score: u8) -> Self {
        Self {
            score,
            fail_after: None,
            calls: Arc::new(AtomicUsize::new(0)),
            translate_calls: Arc::new(AtomicUsize::new(0)),
            proofread_calls: Arc::new(AtomicUsize::new(0)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fail every request after the first `calls`
    pub fn failing_after(mut self, calls: usize) -> Self {
        self.fail_after = Some(calls);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn translate_calls(&self) -> usize {
        self.translate_calls.load(Ordering::SeqCst)
    }

    pub fn proofread_calls(&self) -> usize {
        self.proofread_calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    fn language_of(prompt: &str) -> &str {
        const LEAD: &str = "Translate the following text to ";
        prompt
            .find(LEAD)
            .map(|i| &prompt[i + LEAD.len()..])
            .and_then(|rest| rest.split('.').next())
            .unwrap_or("Unknown")
    }

    fn text_block(prompt: &str) -> &str {
        const MARKER: &str = "Text to translate:\n";
        const TRAILER: &str = "\n\nReturn ONLY";
        let start = prompt.find(MARKER).map(|i| i + MARKER.len()).unwrap_or(0);
        let rest = &prompt[start..];
        let end = rest.find(TRAILER).unwrap_or(rest.len());
        &rest[..end]
    }

    fn translation_line(prompt: &str) -> &str {
        prompt
            .lines()
            .find_map(|line| line.strip_prefix("Translation: "))
            .unwrap_or("")
    }
}

#[async_trait]
impl Provider for RoutingProvider {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let count = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.prompts.lock().push(prompt.to_string());

        if self.fail_after.is_some_and(|limit| count > limit) {
            return Err(ProviderError::ApiError {
                status_code: 503,
                message: "model overloaded".to_string(),
            });
        }

        if prompt.contains(PROOFREAD_MARKER) {
            self.proofread_calls.fetch_add(1, Ordering::SeqCst);
            let corrected = format!("{} (checked)", Self::translation_line(prompt));
            let review = serde_json::json!({
                "score": self.score,
                "corrected": corrected,
                "feedback": "Reads naturally",
            });
            return Ok(format!("```json\n{}\n```", review));
        }

        self.translate_calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("[{}] {}", Self::language_of(prompt), Self::text_block(prompt)))
    }

    fn name(&self) -> &str {
        "routing-mock"
    }
}
