use crate::error::{ColorGenError, Result};
use crate::i18n::Language;

/// One user submission, with the prompt already rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    description: String,
    rendered_prompt: String,
    language: Language,
}

impl GenerationRequest {
    pub fn new(description: impl Into<String>, language: Language) -> Result<Self> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(ColorGenError::ValidationError(
                "Please enter a description first.".into(),
            ));
        }

        let rendered_prompt = language.render_prompt(&description);
        Ok(Self {
            description,
            rendered_prompt,
            language,
        })
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn rendered_prompt(&self) -> &str {
        &self.rendered_prompt
    }

    pub fn language(&self) -> Language {
        self.language
    }
}
