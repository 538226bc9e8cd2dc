//! Round feedback channel: kind + message, transient

use serde::{Deserialize, Serialize};

/// Tone of a feedback message, used by the surfaces to pick color/severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Correct,
    Incorrect,
    Info,
    Warning,
    Skipped,
    Success,
    Error,
}

/// A user-facing message attached to the session; cleared on navigation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub message: String,
}

impl Feedback {
    pub fn new(kind: FeedbackKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn correct(message: impl Into<String>) -> Self {
        Self::new(FeedbackKind::Correct, message)
    }

    pub fn incorrect(message: impl Into<String>) -> Self {
        Self::new(FeedbackKind::Incorrect, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(FeedbackKind::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(FeedbackKind::Warning, message)
    }

    pub fn skipped(message: impl Into<String>) -> Self {
        Self::new(FeedbackKind::Skipped, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(FeedbackKind::Success, message)
    }
}
