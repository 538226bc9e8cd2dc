//! NoirGuess: session engine for a clue-driven song guessing game
//!
//! Core loop: load an obfuscated challenge, reveal clues, evaluate guesses,
//! award XP, resolve rank, progress levels, reconcile into a saved profile.

pub mod core;
pub mod types;

// =============================================================================
// XP ECONOMICS [C]
// =============================================================================

/// XP awarded for a correct guess
pub const XP_PER_CORRECT_GUESS: u64 = 150;

/// XP deducted for skipping a song (saturating, never below zero)
pub const XP_PENALTY_FOR_SKIP: u64 = 25;

/// XP cost to unlock an extra clue as a hint
pub const XP_COST_FOR_HINT: u64 = 50;

/// Score points per correctly guessed song
pub const POINTS_PER_SONG: u64 = 100;

// =============================================================================
// LEVEL PROGRESSION [C]
// =============================================================================

/// Correct songs required to clear level 1, 2, 3, ...
/// Clamped to the last entry once the table is exhausted.
pub const SONGS_TO_NEXT_LEVEL: &[u32] = &[2, 3, 3, 4, 4, 5, 5, 6, 7, 10];

/// Starting solo level
pub const INITIAL_LEVEL: u32 = 1;

/// Starting XP
pub const INITIAL_XP: u64 = 0;

/// Starting score
pub const INITIAL_SCORE: u64 = 0;

/// Difficulty handed to the content provider for non-solo modes
pub const FIXED_DIFFICULTY_NON_SOLO: u32 = 3;

/// Songs needed to clear the given level (1-based), clamped to the table's end
pub fn songs_needed_for(level: u32) -> u32 {
    let idx = (level.max(1) as usize - 1).min(SONGS_TO_NEXT_LEVEL.len() - 1);
    SONGS_TO_NEXT_LEVEL[idx]
}

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_songs_needed_within_table() {
        assert_eq!(songs_needed_for(1), 2);
        assert_eq!(songs_needed_for(2), 3);
        assert_eq!(songs_needed_for(10), 10);
    }

    #[test]
    fn test_songs_needed_clamps_past_table() {
        assert_eq!(songs_needed_for(11), 10);
        assert_eq!(songs_needed_for(99), 10);
    }

    #[test]
    fn test_songs_needed_tolerates_zero_level() {
        // Levels are 1-based; a zero is treated as level 1
        assert_eq!(songs_needed_for(0), 2);
    }
}
