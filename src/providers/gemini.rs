use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use super::{error_from_response, http_client, Provider};
use crate::errors::ProviderError;

/// Gemini client for the Generative Language `generateContent` API
pub struct Gemini {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// Model name, e.g. "gemini-2.5-flash"
    model: String,
    /// API base URL including the version segment
    endpoint: String,
    /// Sampling temperature
    temperature: Option<f32>,
}

impl std::fmt::Debug for Gemini {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gemini")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Request body for `generateContent`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    /// Conversation contents; always a single user turn here
    contents: Vec<GeminiContent>,

    /// Optional generation parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

/// A content block made of text parts
#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiContent {
    /// Role of the author, omitted for single-turn prompts
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub role: Option<String>,

    /// Text parts
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

/// Single text part
#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiPart {
    #[serde(default)]
    pub text: String,
}

/// Generation parameters
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Response body of `generateContent`
#[derive(Debug, Deserialize)]
pub struct GeminiResponse {
    /// Generated candidates
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
}

/// One generated candidate
#[derive(Debug, Deserialize)]
pub struct GeminiCandidate {
    /// Candidate content, missing when blocked by safety filters
    pub content: Option<GeminiContent>,
}

impl GeminiRequest {
    /// Create a single-turn request for a prompt
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart { text: prompt.into() }],
            }],
            generation_config: None,
        }
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: Option<f32>) -> Self {
        self.generation_config = temperature.map(|t| GenerationConfig { temperature: Some(t) });
        self
    }
}

impl Gemini {
    /// Create a new Gemini client
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ProviderError::AuthenticationError(
                "Gemini API key is not configured".to_string(),
            ));
        }

        Ok(Self {
            client: http_client(timeout)?,
            api_key,
            model: model.into(),
            endpoint: endpoint.into(),
            temperature: None,
        })
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Full URL of the generateContent call; the key travels in a header
    fn request_url(&self) -> Result<Url, ProviderError> {
        let raw = format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        );
        Url::parse(&raw)
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid Gemini endpoint {}: {}", raw, e)))
    }

    /// Send a request and return the raw response
    pub async fn complete(&self, request: GeminiRequest) -> Result<GeminiResponse, ProviderError> {
        let response = self
            .client
            .post(self.request_url()?)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response("Gemini", response).await);
        }

        response
            .json::<GeminiResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse Gemini API response: {}", e)))
    }

    /// Extract text from the first candidate
    pub fn extract_text_from_response(response: &GeminiResponse) -> String {
        response
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl Provider for Gemini {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        debug!("Gemini request ({} chars) to model {}", prompt.len(), self.model);
        let request = GeminiRequest::new(prompt).temperature(self.temperature);
        let response = self.complete(request).await?;
        let text = Self::extract_text_from_response(&response);

        if text.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(text)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
