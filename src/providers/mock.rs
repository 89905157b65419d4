/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock providers that simulate different behaviors:
 * - `MockProvider::working()` - Echoes the text block of each prompt back
 * - `MockProvider::scripted()` - Replays queued replies in order
 * - `MockProvider::failing()` - Always fails with an error
 *
 * Every prompt is recorded so tests can assert on what was sent.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Returns the text found after "Text to translate:" unchanged
    Working,
    /// Pops the next queued reply, fails once the queue is empty
    Scripted,
    /// Always fails with an error
    Failing,
    /// Succeeds for the first N calls, then fails
    FailAfter { successes: usize },
}

/// Mock provider for testing translation behavior
///
/// Clones share the call counter, the queue and the recorded prompts.
#[derive(Debug, Clone)]
pub struct MockProvider {
    behavior: MockBehavior,
    request_count: Arc<AtomicUsize>,
    replies: Arc<Mutex<VecDeque<String>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            replies: Arc::new(Mutex::new(VecDeque::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock provider replaying the given replies in order
    pub fn scripted<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let provider = Self::new(MockBehavior::Scripted);
        provider.replies.lock().extend(replies.into_iter().map(Into::into));
        provider
    }

    /// Create a failing mock provider
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a provider that echoes for `successes` calls and fails afterwards
    pub fn fail_after(successes: usize) -> Self {
        Self::new(MockBehavior::FailAfter { successes })
    }

    /// Get the number of requests made
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// All prompts received so far, oldest first
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    /// The most recent prompt, if any
    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().last().cloned()
    }

    /// Pull the text block out of a translation prompt
    fn echo(prompt: &str) -> String {
        const MARKER: &str = "Text to translate:";
        const TRAILER: &str = "Return ONLY the translated text";

        let Some(start) = prompt.find(MARKER) else {
            return prompt.to_string();
        };
        let rest = &prompt[start + MARKER.len()..];
        let end = rest.find(TRAILER).unwrap_or(rest.len());
        rest[..end].trim().to_string()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::working()
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst) + 1;
        self.prompts.lock().push(prompt.to_string());

        match self.behavior {
            MockBehavior::Working => Ok(Self::echo(prompt)),
            MockBehavior::Scripted => self.replies.lock().pop_front().ok_or_else(|| {
                ProviderError::RequestFailed(format!("Mock reply queue exhausted at request {}", count))
            }),
            MockBehavior::Failing => Err(ProviderError::ConnectionError(
                "Mock provider configured to fail".to_string(),
            )),
            MockBehavior::FailAfter { successes } if count > successes => Err(ProviderError::ApiError {
                status_code: 503,
                message: format!("Mock failure at request {}", count),
            }),
            MockBehavior::FailAfter { .. } => Ok(Self::echo(prompt)),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
