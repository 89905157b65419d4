/*!
 * Error types for the adsync application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The model answered but produced no text
    #[error("Provider returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        // Request URLs may carry credentials
        let error = error.without_url();
        if error.is_connect() || error.is_timeout() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Errors raised by the record store
#[derive(Error, Debug)]
pub enum StoreError {
    /// A record failed field validation before it reached the database
    #[error("Invalid {entity}: {reason}")]
    Validation {
        /// Kind of record being validated
        entity: &'static str,
        /// Human readable reason
        reason: String,
    },

    /// Lookup, update or delete of a record that does not exist
    #[error("{entity} not found: {key}")]
    NotFound {
        /// Kind of record
        entity: &'static str,
        /// Identifier or code that was looked up
        key: String,
    },

    /// Underlying SQLite failure
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Connection handling failure (lock poisoning, blocking task panic)
    #[error("Database connection error: {0}")]
    Connection(String),
}

impl StoreError {
    /// Shorthand for a validation failure
    pub fn invalid(entity: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            entity,
            reason: reason.into(),
        }
    }

    /// Shorthand for a missing record
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }
}

/// Configuration problems detected before running an action
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    /// A hosted provider was selected without credentials
    #[error("API key is required for the {0} provider")]
    MissingApiKey(String),

    /// No entry in `available_providers` matches the selected provider
    #[error("No configuration found for provider: {0}")]
    MissingProvider(String),

    /// A configuration value is out of its allowed range
    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidValue {
        /// Name of the offending field
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error while reading or writing records
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from the configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from the record store
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AppError {
    /// Process exit code for this kind of failure
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Store(StoreError::Validation { .. }) | Self::Store(StoreError::NotFound { .. }) => 3,
            Self::Provider(_) | Self::Translation(TranslationError::Provider(_)) => 4,
            _ => 1,
        }
    }
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        // Recover the typed error underneath any added context
        let error = match error.downcast::<ConfigError>() {
            Ok(e) => return Self::Config(e),
            Err(error) => error,
        };
        let error = match error.downcast::<ProviderError>() {
            Ok(e) => return Self::Provider(e),
            Err(error) => error,
        };
        let error = match error.downcast::<StoreError>() {
            Ok(e) => return Self::Store(e),
            Err(error) => error,
        };
        match error.downcast::<TranslationError>() {
            Ok(TranslationError::Store(e)) => Self::Store(e),
            Ok(e) => Self::Translation(e),
            Err(error) => Self::Unknown(format!("{:#}", error)),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
