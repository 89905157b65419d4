/*!
 * Prompt templates for ad copy translation and proofreading.
 *
 * The translation prompt stacks the country's system and user prompts on top
 * of a fixed directive; the proofreading prompt asks for a single JSON object.
 */

/// Template with `{name}` variables
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// The template string with placeholders
    template: String,
}

impl PromptTemplate {
    /// Directive appended after the country prompts
    pub const TRANSLATE_DIRECTIVE: &'static str = "Translate the following text to {language}. \nIMPORTANT: Keep __PLACEHOLDER_X__ markers exactly as they are, do not translate them.\n\nText to translate:\n{text}\n\nReturn ONLY the translated text, no explanations.";

    /// Proofreading instructions
    pub const PROOFREADER: &'static str = r#"You are a translation quality expert. Evaluate this translation from English to {language}.

Original: {original}
Translation: {translation}

Rate the translation quality from 0-100 based on:
- Accuracy (meaning preserved)
- Fluency (natural in target language)
- Marketing tone (persuasive and engaging)
- Grammar and spelling

If there are issues, provide a corrected version.

Respond ONLY in this JSON format:
{"score": <0-100>, "corrected": "<corrected translation or same if perfect>", "feedback": "<brief feedback>"}"#;

    /// Create a new prompt template.
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    /// Translation directive template
    pub fn translate_directive() -> Self {
        Self::new(Self::TRANSLATE_DIRECTIVE)
    }

    /// Proofreading template
    pub fn proofreader() -> Self {
        Self::new(Self::PROOFREADER)
    }

    /// Render the template with the given variables.
    ///
    /// Variables are substituted in one pass so values that themselves
    /// contain `{...}` are not expanded again.
    pub fn render(&self, vars: &[(&str, &str)]) -> String {
        let mut out = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let replaced = after.find('}').and_then(|close| {
                let name = &after[..close];
                vars.iter()
                    .find(|(key, _)| *key == name)
                    .map(|(_, value)| (*value, close))
            });

            match replaced {
                Some((value, close)) => {
                    out.push_str(value);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

/// Builder for the translation prompt of one field
#[derive(Debug, Clone, Default)]
pub struct TranslationPromptBuilder {
    language: String,
    system_prompt: String,
    user_prompt: String,
    text: String,
}

impl TranslationPromptBuilder {
    /// Create a new prompt builder.
    pub fn new(language: &str) -> Self {
        Self {
            language: language.to_string(),
            ..Default::default()
        }
    }

    /// Set the role guidance
    pub fn with_system_prompt(mut self, system_prompt: &str) -> Self {
        self.system_prompt = system_prompt.to_string();
        self
    }

    /// Set the task guidance
    pub fn with_user_prompt(mut self, user_prompt: &str) -> Self {
        self.user_prompt = user_prompt.to_string();
        self
    }

    /// Set the (already protected) text to translate
    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    /// Build the full prompt
    pub fn build(&self) -> String {
        let directive = PromptTemplate::translate_directive()
            .render(&[("language", &self.language), ("text", &self.text)]);
        format!("{}\n\n{}\n\n{}", self.system_prompt, self.user_prompt, directive)
    }
}

/// Build the proofreading prompt for an original and its translation
pub fn build_proofread_prompt(original: &str, translation: &str, language: &str) -> String {
    PromptTemplate::proofreader().render(&[
        ("language", language),
        ("original", original),
        ("translation", translation),
    ])
}
