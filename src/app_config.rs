use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::errors::ConfigError;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// SQLite database file; empty means the per-user data directory
    #[serde(default)]
    pub database_path: String,

    /// Model provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Available model providers
    #[serde(default = "default_available_providers")]
    pub available_providers: Vec<ProviderConfig>,

    /// Proofreading settings
    #[serde(default)]
    pub proofreading: ProofreadingConfig,

    /// System prompt given to newly added countries
    #[serde(default = "default_system_prompt")]
    pub default_system_prompt: String,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Model provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Google Gemini
    #[default]
    Gemini,
    // @provider: OpenAI
    OpenAI,
    // @provider: Anthropic
    Anthropic,
    // @provider: Ollama
    Ollama,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Gemini => "Gemini",
            Self::OpenAI => "OpenAI",
            Self::Anthropic => "Anthropic",
            Self::Ollama => "Ollama",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Gemini => "gemini".to_string(),
            Self::OpenAI => "openai".to_string(),
            Self::Anthropic => "anthropic".to_string(),
            Self::Ollama => "ollama".to_string(),
        }
    }

    /// Whether the provider is a hosted API that needs a key
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, Self::Ollama)
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "openai" => Ok(Self::OpenAI),
            "anthropic" => Ok(Self::Anthropic),
            "ollama" => Ok(Self::Ollama),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        Self {
            provider_type: provider_type.to_lowercase_string(),
            model: default_model(&provider_type),
            api_key: String::new(),
            endpoint: default_endpoint(&provider_type),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
        }
    }
}

/// Settings for the proofreading step
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProofreadingConfig {
    /// Score recorded when the reviewer reply cannot be used
    #[serde(default = "default_fallback_score")]
    pub fallback_score: u8,

    /// Feedback recorded when the reviewer reply cannot be used
    #[serde(default = "default_fallback_feedback")]
    pub fallback_feedback: String,
}

impl Default for ProofreadingConfig {
    fn default() -> Self {
        Self {
            fallback_score: default_fallback_score(),
            fallback_feedback: default_fallback_feedback(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching `log` crate filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_temperature() -> f32 {
    0.3
}

fn default_fallback_score() -> u8 {
    85
}

fn default_fallback_feedback() -> String {
    "Auto-approved".to_string()
}

fn default_system_prompt() -> String {
    "You are a professional translator specializing in marketing copy.".to_string()
}

fn default_available_providers() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig::new(TranslationProvider::Gemini),
        ProviderConfig::new(TranslationProvider::OpenAI),
        ProviderConfig::new(TranslationProvider::Anthropic),
        ProviderConfig::new(TranslationProvider::Ollama),
    ]
}

fn default_endpoint(provider: &TranslationProvider) -> String {
    match provider {
        TranslationProvider::Gemini => "https://generativelanguage.googleapis.com/v1beta".to_string(),
        TranslationProvider::OpenAI => "https://api.openai.com/v1".to_string(),
        TranslationProvider::Anthropic => "https://api.anthropic.com".to_string(),
        TranslationProvider::Ollama => "http://localhost:11434".to_string(),
    }
}

fn default_model(provider: &TranslationProvider) -> String {
    match provider {
        TranslationProvider::Gemini => "gemini-2.5-flash".to_string(),
        TranslationProvider::OpenAI => "gpt-4o-mini".to_string(),
        TranslationProvider::Anthropic => "claude-3-haiku".to_string(),
        TranslationProvider::Ollama => "llama3.2:3b".to_string(),
    }
}

/// Values given on the command line that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub provider: Option<TranslationProvider>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub database_path: Option<PathBuf>,
    pub log_level: Option<LogLevel>,
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            database_path: String::new(),
            provider: TranslationProvider::default(),
            available_providers: default_available_providers(),
            proofreading: ProofreadingConfig::default(),
            default_system_prompt: default_system_prompt(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load the configuration file, creating it with defaults when missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        log::warn!("Config file not found at '{}', creating default config.", path.display());

        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the values that every command depends on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.proofreading.fallback_score > 100 {
            return Err(ConfigError::InvalidValue {
                field: "proofreading.fallback_score",
                reason: format!("{} is above 100", self.proofreading.fallback_score),
            });
        }

        if let Some(provider_config) = self.get_active_provider_config() {
            if provider_config.timeout_secs == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "timeout_secs",
                    reason: "must be greater than zero".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Validate that the selected provider can actually be called.
    ///
    /// Data-only commands skip this so the store stays usable without credentials.
    pub fn validate_provider(&self) -> Result<(), ConfigError> {
        let provider_config = self
            .get_active_provider_config()
            .ok_or_else(|| ConfigError::MissingProvider(self.provider.to_lowercase_string()))?;

        if self.provider.requires_api_key() && provider_config.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey(
                self.provider.display_name().to_string(),
            ));
        }

        Ok(())
    }

    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        self.get_provider_config(&self.provider)
    }

    /// Get a specific provider configuration by type
    pub fn get_provider_config(&self, provider_type: &TranslationProvider) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers
            .iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Mutable access to the active provider entry, inserting defaults when absent
    pub fn active_provider_config_mut(&mut self) -> &mut ProviderConfig {
        let provider_str = self.provider.to_lowercase_string();
        let index = match self
            .available_providers
            .iter()
            .position(|p| p.provider_type == provider_str)
        {
            Some(index) => index,
            None => {
                self.available_providers
                    .push(ProviderConfig::new(self.provider.clone()));
                self.available_providers.len() - 1
            }
        };
        &mut self.available_providers[index]
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }

        default_model(&self.provider)
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        default_endpoint(&self.provider)
    }

    /// Get the API key for the active provider
    pub fn get_api_key(&self) -> String {
        self.get_active_provider_config()
            .map(|p| p.api_key.clone())
            .unwrap_or_default()
    }

    /// Apply command line overrides
    ///
    /// The provider is switched first so that `model` and `api_key` land on
    /// the newly selected provider's entry. A blank API key is ignored.
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(provider) = overrides.provider {
            self.provider = provider;
        }
        if let Some(model) = overrides.model {
            self.active_provider_config_mut().model = model;
        }
        if let Some(api_key) = overrides.api_key.filter(|k| !k.trim().is_empty()) {
            self.active_provider_config_mut().api_key = api_key;
        }
        if let Some(database_path) = overrides.database_path {
            self.database_path = database_path.to_string_lossy().to_string();
        }
        if let Some(log_level) = overrides.log_level {
            self.log_level = log_level;
        }
    }

    /// Resolve the SQLite file location
    pub fn resolve_database_path(&self) -> Result<PathBuf> {
        if !self.database_path.trim().is_empty() {
            return Ok(PathBuf::from(&self.database_path));
        }

        crate::database::DatabaseConnection::default_database_path()
    }
}
