/*!
 * # AdSync - multilingual ad copy console
 *
 * A Rust library for translating advertising copy per target country with
 * hosted language models.
 *
 * ## Features
 *
 * - Store ad copy templates, country prompt settings and translations in SQLite
 * - Translate ad copy with various AI providers:
 *   - Gemini (Google Generative Language API)
 *   - OpenAI API
 *   - Anthropic API
 *   - Ollama (local LLM)
 * - Keep `<placeholder>` tokens intact through translation
 * - Proofread and score every translation
 * - Bulk translation with progress reporting
 * - Prompt testing per country
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `database`: SQLite persistence and repository
 * - `translation`: AI-powered translation services:
 *   - `translation::placeholders`: Tag protection
 *   - `translation::translator`: Placeholder-preserving translator
 *   - `translation::proofreader`: Quality scoring
 *   - `translation::bulk`: Ad copies × countries orchestration
 *   - `translation::prompt_lab`: Prompt experiments
 * - `app_controller`: Main application controller
 * - `language_utils`: Language name and ISO code utilities
 * - `providers`: Client implementations for various LLM providers
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]
// camelCase segments in test names
#![cfg_attr(test, allow(non_snake_case))]

// Public modules
pub mod app_config;
pub mod database;
pub mod translation;
pub mod app_controller;
pub mod language_utils;
pub mod providers;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use database::Repository;
pub use translation::{BulkTranslator, PlaceholderMap, Proofreader, Translator};
pub use language_utils::resolve_language_name;
pub use errors::{AppError, ConfigError, ProviderError, StoreError, TranslationError};
