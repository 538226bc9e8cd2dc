//! Clue/hint ledger: bounded reveal counter with hint economics
//!
//! `0 <= revealed <= total` at all times. Free reveals advance one clue at a
//! time; hints buy the same advance for XP through the counters' single
//! mutation path.

use serde::{Deserialize, Serialize};

use crate::types::{SessionCounters, ValidationError};
use crate::XP_COST_FOR_HINT;

/// Tracks how many clues of the active challenge are unlocked
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClueLedger {
    revealed: usize,
    total: usize,
}

impl ClueLedger {
    /// Fresh ledger with no clue revealed yet
    pub fn new(total: usize) -> Self {
        Self { revealed: 0, total }
    }

    pub fn revealed(&self) -> usize {
        self.revealed
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn exhausted(&self) -> bool {
        self.revealed >= self.total
    }

    /// Reveal the next clue for free. No-op once fully revealed; returns
    /// whether the counter advanced.
    pub fn reveal_next(&mut self) -> bool {
        if self.exhausted() {
            return false;
        }
        self.revealed += 1;
        true
    }

    /// Buy the next clue for XP. Rejections are distinct - insufficient XP vs
    /// nothing left to reveal - and leave both the ledger and the counters
    /// untouched.
    pub fn use_hint(&mut self, counters: &mut SessionCounters) -> Result<(), ValidationError> {
        if counters.xp() < XP_COST_FOR_HINT {
            return Err(ValidationError::InsufficientXp {
                have: counters.xp(),
                need: XP_COST_FOR_HINT,
            });
        }
        if self.exhausted() {
            return Err(ValidationError::AllCluesRevealed);
        }
        counters.spend_xp(XP_COST_FOR_HINT)?;
        self.revealed += 1;
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
