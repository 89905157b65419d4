/*!
 * Prompt construction for translation and proofreading.
 *
 * This module provides:
 * - The fixed translation directive and proofreading template
 * - A builder that stacks country prompts on top of the directive
 */

pub mod templates;

// Re-export main types
pub use templates::{build_proofread_prompt, PromptTemplate, TranslationPromptBuilder};
