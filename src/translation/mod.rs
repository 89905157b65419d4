/*!
 * Translation of ad copy using AI providers.
 *
 * This module contains the model-facing logic. It is split into several
 * submodules:
 *
 * - `placeholders`: Protection of `<tag>` tokens behind numbered sentinels
 * - `prompts`: Prompt templates for translation and proofreading
 * - `translator`: Placeholder-preserving single text translation
 * - `proofreader`: Quality scoring with strict reply parsing
 * - `progress`: Progress reporting for long jobs
 * - `bulk`: Ad copies × countries orchestration
 * - `prompt_lab`: Testing and promoting country prompts
 */

// Re-export main types for easier usage
pub use self::bulk::{BulkSummary, BulkTranslator};
pub use self::placeholders::{extract_placeholders, PlaceholderMap};
pub use self::progress::{IndicatifProgress, NoProgress, ProgressReporter, RecordingProgress};
pub use self::prompt_lab::{PromptLab, PromptTestReport, DEFAULT_SAMPLE_TEXT};
pub use self::proofreader::{ProofreadOutcome, ProofreadResult, Proofreader};
pub use self::translator::{TranslationTarget, Translator};

// Submodules
pub mod bulk;
pub mod placeholders;
pub mod progress;
pub mod prompt_lab;
pub mod prompts;
pub mod proofreader;
pub mod translator;
