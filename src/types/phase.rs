//! Session phases as a tagged union
//!
//! Each variant carries only the data that is valid in that phase: the active
//! challenge exists exclusively inside the in-round variants, so "guessing
//! without a challenge" is unrepresentable rather than guarded at call sites.

use serde::{Deserialize, Serialize};

use crate::core::ClueLedger;
use crate::types::{Challenge, LobbyStub};

/// A displayable image reference produced by the image provider (or the
/// deterministic placeholder fallback)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageRef {
    pub url: String,
    /// True when this is the degraded-mode placeholder, not a rendered image
    pub placeholder: bool,
}

/// In-round state: the active challenge plus its clue ledger
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Round {
    pub challenge: Challenge,
    pub ledger: ClueLedger,
}

impl Round {
    /// Start a round: the first clue is auto-revealed when any clue exists
    pub fn new(challenge: Challenge) -> Self {
        let mut ledger = ClueLedger::new(challenge.clue_count());
        ledger.reveal_next();
        Self { challenge, ledger }
    }

    /// The clues currently visible to the player, in order
    pub fn revealed_clues(&self) -> &[String] {
        &self.challenge.clues()[..self.ledger.revealed()]
    }
}

/// How the round ended, carried through image generation into the reveal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundOutcome {
    Correct,
    Skipped,
}

/// A finished round ready for display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundReveal {
    pub challenge: Challenge,
    pub image: Option<ImageRef>,
    /// True when image rendering failed and the placeholder stands in
    pub degraded: bool,
    pub outcome: RoundOutcome,
}

/// The session state machine's phase
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "phase", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Entry screen, pure navigation
    Landing,
    /// Mode selection, pure navigation
    ModeSelect,
    /// Profile management screen, pure navigation
    ProfileView,
    /// Multiplayer lobby placeholder, no game-logic side effects
    Lobby(LobbyStub),
    /// A challenge request is outstanding (or about to be issued)
    LoadingChallenge,
    /// Player is reading clues and may guess, reveal, hint or skip
    Guessing(Round),
    /// A guess is being evaluated; input is locked
    SubmittingGuess(Round),
    /// Round resolved; image request outstanding
    GeneratingImage {
        round: Round,
        outcome: RoundOutcome,
    },
    /// Correct guess revealed
    Revealed(RoundReveal),
    /// Skipped song revealed
    SkippedRevealed(RoundReveal),
    /// Celebratory interstitial after clearing a level
    LevelUp { level: u32 },
    /// Unrecoverable failure; the player must restart explicitly
    Error { message: String },
}

impl Phase {
    /// Short phase name for gating messages, logs and views
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Landing => "Landing",
            Phase::ModeSelect => "ModeSelect",
            Phase::ProfileView => "ProfileView",
            Phase::Lobby(_) => "Lobby",
            Phase::LoadingChallenge => "LoadingChallenge",
            Phase::Guessing(_) => "Guessing",
            Phase::SubmittingGuess(_) => "SubmittingGuess",
            Phase::GeneratingImage { .. } => "GeneratingImage",
            Phase::Revealed(_) => "Revealed",
            Phase::SkippedRevealed(_) => "SkippedRevealed",
            Phase::LevelUp { .. } => "LevelUp",
            Phase::Error { .. } => "Error",
        }
    }

    /// True for phases that are part of an active round
    pub fn in_round(&self) -> bool {
        matches!(
            self,
            Phase::LoadingChallenge
                | Phase::Guessing(_)
                | Phase::SubmittingGuess(_)
                | Phase::GeneratingImage { .. }
                | Phase::Revealed(_)
                | Phase::SkippedRevealed(_)
                | Phase::LevelUp { .. }
        )
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// =============================================================================
// TESTS
// =============================================================================
