/*!
 * Provider implementations for the hosted language models.
 *
 * This module contains client implementations for various LLM providers:
 * - Gemini: Google Generative Language API
 * - OpenAI: OpenAI chat completions API
 * - Anthropic: Anthropic messages API
 * - Ollama: Local LLM server
 * - Mock: scripted provider for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::{Config, TranslationProvider};
use crate::errors::ProviderError;

/// Common trait for all LLM providers
///
/// The translation layer only ever sends one composed prompt and reads one
/// text reply, so this is the whole contract.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Generate text for a single prompt
    ///
    /// # Arguments
    /// * `prompt` - The fully composed prompt
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The model's text reply or an error
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.generate("Hello").await.map(|_| ())
    }

    /// Short provider name for logs
    fn name(&self) -> &str;
}

pub mod gemini;
pub mod openai;
pub mod anthropic;
pub mod ollama;
pub mod mock;

/// Build the provider selected in the configuration
pub fn from_config(config: &Config) -> Result<Arc<dyn Provider>, ProviderError> {
    let provider_config = config.get_active_provider_config();
    let timeout = Duration::from_secs(provider_config.map(|p| p.timeout_secs).unwrap_or(60));
    let temperature = provider_config.map(|p| p.temperature).unwrap_or(0.3);
    let model = config.get_model();
    let endpoint = config.get_endpoint();
    let api_key = config.get_api_key();

    let provider: Arc<dyn Provider> = match config.provider {
        TranslationProvider::Gemini => Arc::new(
            gemini::Gemini::new(api_key, model, endpoint, timeout)?.temperature(temperature),
        ),
        TranslationProvider::OpenAI => Arc::new(
            openai::OpenAI::new(api_key, model, endpoint, timeout)?.temperature(temperature),
        ),
        TranslationProvider::Anthropic => Arc::new(
            anthropic::Anthropic::new(api_key, model, endpoint, timeout)?.temperature(temperature),
        ),
        TranslationProvider::Ollama => Arc::new(
            ollama::Ollama::new(model, endpoint, timeout)?.temperature(temperature),
        ),
    };

    Ok(provider)
}

/// Build an HTTP client with the given request timeout
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::ConnectionError(format!("Failed to build HTTP client: {}", e)))
}

/// Turn a non-success HTTP response into a provider error
pub(crate) async fn error_from_response(provider: &str, response: reqwest::Response) -> ProviderError {
    let status = response.status();
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to get error response text".to_string());
    log::error!("{} API error ({}): {}", provider, status, error_text);

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        ProviderError::AuthenticationError(error_text)
    } else {
        ProviderError::ApiError {
            status_code: status.as_u16(),
            message: error_text,
        }
    }
}
