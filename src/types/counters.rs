//! Session counters: XP, score, level progress, played titles
//!
//! Invariant: `rank_name == resolve_rank(xp).name` at all times. The only XP
//! mutation paths are `award_xp`, `spend_xp` and `penalize_xp`, each of which
//! recomputes the rank before returning.

use std::collections::HashSet;

use serde::Serialize;

use crate::types::{resolve_rank, Profile, ValidationError};
use crate::{INITIAL_LEVEL, INITIAL_SCORE, INITIAL_XP};

/// Transient, in-memory progress for the current play-through
#[derive(Debug, Clone, Serialize)]
pub struct SessionCounters {
    xp: u64,
    rank_name: &'static str,
    /// Solo level, 1-based
    pub level: u32,
    pub songs_correct_this_level: u32,
    pub score: u64,
    /// Titles served this session (insertion order irrelevant)
    pub played_titles: HashSet<String>,
}

impl Default for SessionCounters {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionCounters {
    /// Zeroed defaults for a fresh player
    pub fn new() -> Self {
        Self {
            xp: INITIAL_XP,
            rank_name: resolve_rank(INITIAL_XP).name,
            level: INITIAL_LEVEL,
            songs_correct_this_level: 0,
            score: INITIAL_SCORE,
            played_titles: HashSet::new(),
        }
    }

    /// Seed counters from a loaded profile
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            xp: profile.xp,
            rank_name: resolve_rank(profile.xp).name,
            level: profile.level.max(1),
            songs_correct_this_level: 0,
            score: INITIAL_SCORE,
            played_titles: profile.played_titles.clone(),
        }
    }

    pub fn xp(&self) -> u64 {
        self.xp
    }

    /// Always consistent with `resolve_rank(self.xp())`
    pub fn rank_name(&self) -> &'static str {
        self.rank_name
    }

    /// Add XP and recompute rank
    pub fn award_xp(&mut self, amount: u64) {
        self.xp = self.xp.saturating_add(amount);
        self.rank_name = resolve_rank(self.xp).name;
    }

    /// Deduct XP for a purchase; rejects if the balance is short.
    /// No mutation on rejection.
    pub fn spend_xp(&mut self, cost: u64) -> Result<(), ValidationError> {
        if self.xp < cost {
            return Err(ValidationError::InsufficientXp {
                have: self.xp,
                need: cost,
            });
        }
        self.xp -= cost;
        self.rank_name = resolve_rank(self.xp).name;
        Ok(())
    }

    /// Deduct XP as a penalty, saturating at zero
    pub fn penalize_xp(&mut self, penalty: u64) {
        self.xp = self.xp.saturating_sub(penalty);
        self.rank_name = resolve_rank(self.xp).name;
    }
}

// =============================================================================
// TESTS
// =============================================================================
