//! Guess evaluation: normalized exact match
//!
//! Trims surrounding whitespace and lowercases both sides, then compares for
//! exact equality. Substring and fuzzy matching are deliberately excluded so
//! the win condition stays unambiguous.

/// Canonical form of a guess or title for comparison
pub fn normalize_guess(input: &str) -> String {
    input.trim().to_lowercase()
}

/// Does the player's raw input match the canonical title?
pub fn guess_matches(guess: &str, title: &str) -> bool {
    normalize_guess(guess) == normalize_guess(title)
}

// =============================================================================
// TESTS
// =============================================================================
