//! Challenge: one round's song puzzle

use serde::{Deserialize, Serialize};

use crate::types::ContentError;

/// The active puzzle instance: canonical answer, ordered clues, image prompt.
/// Immutable once built; only constructed through [`Challenge::new`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Challenge {
    title: String,
    clues: Vec<String>,
    image_prompt: String,
}

impl Challenge {
    /// Build a challenge, enforcing the provider contract: non-empty title,
    /// 1-4 non-empty clues, non-empty image prompt. Violations are a
    /// `ContentError`, indistinguishable from a failed fetch to the caller.
    pub fn new(
        title: impl Into<String>,
        clues: Vec<String>,
        image_prompt: impl Into<String>,
    ) -> Result<Self, ContentError> {
        let title = title.into();
        let image_prompt = image_prompt.into();

        if title.trim().is_empty() {
            return Err(ContentError::Malformed("empty song title".to_string()));
        }
        if clues.is_empty() || clues.len() > 4 {
            return Err(ContentError::Malformed(format!(
                "expected 1-4 clues, got {}",
                clues.len()
            )));
        }
        if clues.iter().any(|c| c.trim().is_empty()) {
            return Err(ContentError::Malformed("empty clue string".to_string()));
        }
        if image_prompt.trim().is_empty() {
            return Err(ContentError::Malformed("empty image prompt".to_string()));
        }

        Ok(Self {
            title,
            clues,
            image_prompt,
        })
    }

    /// Canonical answer string
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Ordered clue list (1-4 entries)
    pub fn clues(&self) -> &[String] {
        &self.clues
    }

    pub fn clue_count(&self) -> usize {
        self.clues.len()
    }

    /// Prompt handed to the image provider
    pub fn image_prompt(&self) -> &str {
        &self.image_prompt
    }
}

// =============================================================================
// TESTS
// =============================================================================
