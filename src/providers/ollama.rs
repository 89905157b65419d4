use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use super::{error_from_response, http_client, Provider};
use crate::errors::ProviderError;

/// Ollama client for interacting with a local Ollama server
pub struct Ollama {
    /// Base URL of the Ollama API
    base_url: String,
    /// HTTP client for making requests
    client: Client,
    /// Model name
    model: String,
    /// Sampling temperature
    temperature: Option<f32>,
}

impl std::fmt::Debug for Ollama {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ollama")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Generate request for the Ollama API
#[derive(Debug, Serialize)]
pub struct GenerationRequest {
    /// Model name to use for generation
    model: String,
    /// Prompt to generate from
    prompt: String,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
    /// Whether to stream the response
    stream: bool,
}

/// Generation options for the Ollama API
#[derive(Debug, Serialize)]
pub struct GenerationOptions {
    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Generation response from the Ollama API
#[derive(Debug, Deserialize)]
pub struct GenerationResponse {
    /// Generated text
    pub response: String,
    /// Whether the generation is complete
    #[serde(default)]
    pub done: bool,
}

impl GenerationRequest {
    /// Create a new non-streaming generation request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            options: None,
            stream: false,
        }
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: Option<f32>) -> Self {
        self.options = temperature.map(|t| GenerationOptions { temperature: Some(t) });
        self
    }
}

impl Ollama {
    /// Create a new Ollama client for a server URL such as "http://localhost:11434"
    pub fn new(
        model: impl Into<String>,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let endpoint = endpoint.into();

        // Accept bare host:port by assuming http
        let with_scheme = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint
        } else {
            format!("http://{}", endpoint)
        };
        let url = Url::parse(&with_scheme)
            .map_err(|e| ProviderError::ConnectionError(format!("Invalid Ollama endpoint {}: {}", with_scheme, e)))?;

        Ok(Self {
            base_url: url.as_str().trim_end_matches('/').to_string(),
            client: http_client(timeout)?,
            model: model.into(),
            temperature: None,
        })
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Base URL used for requests
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Generate text from the Ollama API
    pub async fn complete(&self, request: GenerationRequest) -> Result<GenerationResponse, ProviderError> {
        let url = format!("{}/api/generate", self.base_url);

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            return Err(error_from_response("Ollama", response).await);
        }

        response
            .json::<GenerationResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse Ollama response: {}", e)))
    }
}

#[async_trait]
impl Provider for Ollama {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        debug!("Ollama request ({} chars) to model {}", prompt.len(), self.model);
        let request = GenerationRequest::new(&self.model, prompt).temperature(self.temperature);
        let response = self.complete(request).await?;

        if response.response.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(response.response)
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
