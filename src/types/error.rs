//! Error taxonomy
//!
//! Severity contract:
//! - `ContentError` is fatal to the current round (blocking error phase)
//! - `ImageError` degrades to a placeholder image, never fails the round
//! - `StoreError` surfaces as a transient notice, game state unaffected
//! - `ValidationError` is rejected synchronously with no state mutation

use thiserror::Error;

/// Challenge fetch failed or returned malformed data
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContentError {
    /// Provider request failed (network, backend, parse failure)
    #[error("challenge request failed: {0}")]
    Request(String),
    /// Provider responded but required fields are missing or empty
    #[error("malformed challenge: {0}")]
    Malformed(String),
    /// Provider has no eligible title left outside the exclusion list
    #[error("content exhausted: no unplayed songs left at this difficulty")]
    Exhausted,
}

/// Image render failed (non-fatal)
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("image render failed: {0}")]
pub struct ImageError(pub String);

/// Profile persistence failed (non-fatal)
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("profile store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("profile serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Request rejected before any state change
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("not enough XP for a hint ({have} XP, costs {need})")]
    InsufficientXp { have: u64, need: u64 },
    #[error("all clues are already revealed")]
    AllCluesRevealed,
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("'{action}' is not allowed in the {phase} phase")]
    IllegalAction {
        action: &'static str,
        phase: &'static str,
    },
}
