//! Session state machine
//!
//! One engine object, one method per external event, all mutation behind
//! `&mut self` - the single-writer reducer for the whole session. Phase gating
//! makes double-submits impossible: the transition into `LoadingChallenge`,
//! `SubmittingGuess` or `GeneratingImage` leaves the phase that made the
//! action legal, and the exclusive borrow across the provider await keeps any
//! other event from interleaving.
//!
//! Failure semantics:
//! - content failure: blocking `Error` phase, counters untouched
//! - image failure: deterministic placeholder + warning, round still resolves
//! - store failure: notice only, game state unaffected

use std::collections::HashSet;
use std::mem;

use tracing::{debug, warn};

use crate::core::guess::guess_matches;
use crate::core::providers::{placeholder_image, ContentProvider, ImageProvider};
use crate::core::reconcile::{ProfileReconciler, ProfileStore};
use crate::types::{
    Feedback, GameMode, LobbyStub, Phase, Profile, Round, RoundOutcome, RoundReveal,
    SessionCounters, SessionView, ValidationError,
};
use crate::{
    songs_needed_for, FIXED_DIFFICULTY_NON_SOLO, POINTS_PER_SONG, XP_COST_FOR_HINT,
    XP_PENALTY_FOR_SKIP, XP_PER_CORRECT_GUESS,
};

/// The session orchestrator: owns the phase, counters, selected mode and the
/// three collaborator seams.
pub struct SessionEngine<C, I, S>
where
    C: ContentProvider,
    I: ImageProvider,
    S: ProfileStore,
{
    content: C,
    image: I,
    reconciler: ProfileReconciler<S>,
    phase: Phase,
    counters: SessionCounters,
    mode: Option<GameMode>,
    profile: Option<Profile>,
    feedback: Option<Feedback>,
}

impl<C, I, S> SessionEngine<C, I, S>
where
    C: ContentProvider,
    I: ImageProvider,
    S: ProfileStore,
{
    /// Create an engine, loading any persisted profile and seeding the
    /// counters from it.
    pub fn new(content: C, image: I, store: S) -> Self {
        let reconciler = ProfileReconciler::new(store);
        let profile = reconciler.load();
        let counters = match &profile {
            Some(p) => SessionCounters::from_profile(p),
            None => SessionCounters::new(),
        };
        Self {
            content,
            image,
            reconciler,
            phase: Phase::Landing,
            counters,
            mode: None,
            profile,
            feedback: None,
        }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn counters(&self) -> &SessionCounters {
        &self.counters
    }

    pub fn mode(&self) -> Option<GameMode> {
        self.mode
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    // =========================================================================
    // NAVIGATION (no game-logic side effects)
    // =========================================================================

    /// Landing screen → mode selection
    pub fn start_descent(&mut self) -> Result<(), ValidationError> {
        match self.phase {
            Phase::Landing => {
                self.set_phase(Phase::ModeSelect);
                Ok(())
            }
            _ => Err(self.illegal("start_descent")),
        }
    }

    /// Open the profile screen from a menu phase
    pub fn open_profile(&mut self) -> Result<(), ValidationError> {
        match self.phase {
            Phase::Landing | Phase::ModeSelect => {
                self.feedback = None;
                self.set_phase(Phase::ProfileView);
                Ok(())
            }
            _ => Err(self.illegal("open_profile")),
        }
    }

    /// Leave the profile screen or lobby back to mode selection
    pub fn back_to_mode_select(&mut self) -> Result<(), ValidationError> {
        match self.phase {
            Phase::ProfileView | Phase::Lobby(_) => {
                self.feedback = None;
                self.set_phase(Phase::ModeSelect);
                Ok(())
            }
            _ => Err(self.illegal("back_to_mode_select")),
        }
    }

    // =========================================================================
    // SESSION LIFECYCLE
    // =========================================================================

    /// Select a mode and start a session. Counters reset, inheriting
    /// XP/level/rank/played titles from the profile when one is loaded.
    /// Solo heads straight into a round; the other modes park in the inert
    /// lobby stub.
    pub fn start_session(&mut self, mode: GameMode) -> Result<(), ValidationError> {
        match self.phase {
            Phase::ModeSelect => {}
            _ => return Err(self.illegal("start_session")),
        }

        self.counters = match &self.profile {
            Some(p) => SessionCounters::from_profile(p),
            None => SessionCounters::new(),
        };
        self.mode = Some(mode);
        self.feedback = None;

        if mode.is_solo() {
            self.set_phase(Phase::LoadingChallenge);
        } else {
            self.set_phase(Phase::Lobby(LobbyStub::new(mode)));
        }
        Ok(())
    }

    /// Lobby stub's "start": enters the round loop at the fixed difficulty
    pub fn start_lobby_game(&mut self) -> Result<(), ValidationError> {
        match self.phase {
            Phase::Lobby(_) => {
                self.set_phase(Phase::LoadingChallenge);
                Ok(())
            }
            _ => Err(self.illegal("start_lobby_game")),
        }
    }

    /// Request the next challenge from the content provider. Valid only in
    /// `LoadingChallenge`. A provider failure is fatal to the round: the
    /// session lands in the blocking `Error` phase with counters untouched.
    pub async fn load_next_challenge(&mut self) -> Result<(), ValidationError> {
        match self.phase {
            Phase::LoadingChallenge => {}
            _ => return Err(self.illegal("load_next_challenge")),
        }

        let difficulty = self.effective_difficulty();
        let exclude = self.exclusion_list();

        match self.content.request_challenge(difficulty, &exclude).await {
            Ok(challenge) => {
                self.counters
                    .played_titles
                    .insert(challenge.title().to_string());
                self.feedback = None;
                self.set_phase(Phase::Guessing(Round::new(challenge)));
            }
            Err(e) => {
                warn!("challenge request failed: {}", e);
                self.set_phase(Phase::Error {
                    message: format!("Failed to load the next song: {}", e),
                });
            }
        }
        Ok(())
    }

    // =========================================================================
    // IN-ROUND EVENTS
    // =========================================================================

    /// Evaluate a guess. Valid only in `Guessing`; input locks for the
    /// duration. Returns whether the guess matched.
    pub async fn submit_guess(&mut self, text: &str) -> Result<bool, ValidationError> {
        let round = match mem::replace(&mut self.phase, Phase::LoadingChallenge) {
            Phase::Guessing(round) => round,
            other => {
                let err = ValidationError::IllegalAction {
                    action: "submit_guess",
                    phase: other.name(),
                };
                self.phase = other;
                return Err(err);
            }
        };

        debug!(phase = "SubmittingGuess", guess = text, "evaluating guess");
        self.phase = Phase::SubmittingGuess(round.clone());

        if !guess_matches(text, round.challenge.title()) {
            self.feedback = Some(Feedback::incorrect(format!(
                "Distortion... \"{}\" is not the signal. Try again.",
                text.trim()
            )));
            self.set_phase(Phase::Guessing(round));
            return Ok(false);
        }

        self.counters.award_xp(XP_PER_CORRECT_GUESS);
        self.counters.score += POINTS_PER_SONG;
        if self.mode.map(|m| m.is_solo()).unwrap_or(false) {
            self.counters.songs_correct_this_level += 1;
        }
        self.feedback = Some(Feedback::correct(format!(
            "Correct: \"{}\". Visualizing...",
            round.challenge.title()
        )));

        self.resolve_round(round, RoundOutcome::Correct).await;
        Ok(true)
    }

    /// Give up on the current song: saturating XP penalty, then reveal
    pub async fn skip_song(&mut self) -> Result<(), ValidationError> {
        let round = match mem::replace(&mut self.phase, Phase::LoadingChallenge) {
            Phase::Guessing(round) => round,
            other => {
                let err = ValidationError::IllegalAction {
                    action: "skip_song",
                    phase: other.name(),
                };
                self.phase = other;
                return Err(err);
            }
        };

        self.counters.penalize_xp(XP_PENALTY_FOR_SKIP);
        self.feedback = Some(Feedback::skipped(format!(
            "The song was: \"{}\". Skipped.",
            round.challenge.title()
        )));

        self.resolve_round(round, RoundOutcome::Skipped).await;
        Ok(())
    }

    /// Reveal the next clue for free. Idempotent no-op once all clues are
    /// visible; returns whether a clue was revealed.
    pub fn reveal_next_clue(&mut self) -> Result<bool, ValidationError> {
        match &mut self.phase {
            Phase::Guessing(round) => {
                let advanced = round.ledger.reveal_next();
                if advanced {
                    self.feedback = None;
                }
                Ok(advanced)
            }
            _ => Err(self.illegal("reveal_next_clue")),
        }
    }

    /// Buy the next clue for XP. Distinct rejections for insufficient XP vs
    /// exhausted clues; neither mutates anything.
    pub fn use_hint(&mut self) -> Result<(), ValidationError> {
        match &mut self.phase {
            Phase::Guessing(round) => {
                round.ledger.use_hint(&mut self.counters)?;
                self.feedback = Some(Feedback::info(format!(
                    "Hint unlocked. {} XP deducted.",
                    XP_COST_FOR_HINT
                )));
                Ok(())
            }
            _ => Err(self.illegal("use_hint")),
        }
    }

    /// Leave the reveal screen. Solo mode checks level progress here: exactly
    /// one level increment when the threshold is met, then the celebratory
    /// interstitial; otherwise straight to the next round.
    pub fn proceed_to_next_stage(&mut self) -> Result<(), ValidationError> {
        match self.phase {
            Phase::Revealed(_) | Phase::SkippedRevealed(_) => {}
            _ => return Err(self.illegal("proceed_to_next_stage")),
        }

        let solo = self.mode.map(|m| m.is_solo()).unwrap_or(false);
        if solo && self.counters.songs_correct_this_level >= songs_needed_for(self.counters.level) {
            self.counters.level += 1;
            self.counters.songs_correct_this_level = 0;
            self.feedback = Some(Feedback::success(format!(
                "LEVEL UP! Reached Level {}!",
                self.counters.level
            )));
            self.set_phase(Phase::LevelUp {
                level: self.counters.level,
            });
        } else {
            self.feedback = None;
            self.set_phase(Phase::LoadingChallenge);
        }
        Ok(())
    }

    /// Dismiss the level-up interstitial
    pub fn continue_after_level_up(&mut self) -> Result<(), ValidationError> {
        match self.phase {
            Phase::LevelUp { .. } => {
                self.feedback = None;
                self.set_phase(Phase::LoadingChallenge);
                Ok(())
            }
            _ => Err(self.illegal("continue_after_level_up")),
        }
    }

    /// Abandon the round (or leave a fatal error) back to mode selection.
    /// Clears the active challenge and selected mode; counters are preserved.
    pub fn return_to_menu(&mut self) -> Result<(), ValidationError> {
        let allowed = self.phase.in_round()
            || matches!(self.phase, Phase::Lobby(_) | Phase::Error { .. });
        if !allowed {
            return Err(self.illegal("return_to_menu"));
        }
        self.mode = None;
        self.feedback = Some(Feedback::info(
            "Game ended. Select a new mode or manage profile.",
        ));
        self.set_phase(Phase::ModeSelect);
        Ok(())
    }

    // =========================================================================
    // PROFILE EVENTS
    // =========================================================================

    /// Persist the session's progress under the given username. Persistence is
    /// opt-in and may happen at any point; a store failure surfaces as a
    /// warning notice, never as a session error.
    pub fn save_profile(&mut self, username: &str) -> Result<(), ValidationError> {
        let merged = ProfileReconciler::<S>::merge(username, &self.counters, self.profile.as_ref())?;

        match self.reconciler.persist(&merged) {
            Ok(()) => {
                self.feedback = Some(Feedback::success("Profile saved. Your legend grows."));
            }
            Err(e) => {
                warn!("profile save failed: {}", e);
                self.feedback = Some(Feedback::warning(format!(
                    "Profile could not be saved ({}). Progress kept for this session.",
                    e
                )));
            }
        }
        self.profile = Some(merged);
        Ok(())
    }

    /// Delete the persisted record and reset the counters to defaults.
    /// Returns to mode selection.
    pub fn clear_profile(&mut self) {
        if let Err(e) = self.reconciler.clear() {
            warn!("profile clear failed: {}", e);
            self.feedback = Some(Feedback::warning(format!(
                "Profile could not be cleared ({}).",
                e
            )));
        } else {
            self.feedback = Some(Feedback::warning(
                "Profile cleared. A fresh slate in the shadows.",
            ));
        }
        self.profile = None;
        self.counters = SessionCounters::new();
        self.mode = None;
        self.set_phase(Phase::ModeSelect);
    }

    // =========================================================================
    // VIEW
    // =========================================================================

    /// Snapshot the session for display
    pub fn view(&self) -> SessionView {
        let solo = self.mode.map(|m| m.is_solo()).unwrap_or(false);
        let songs_needed = if solo {
            songs_needed_for(self.counters.level)
        } else {
            0
        };

        let (revealed_clues, total_clues, answer, outcome, image) = match &self.phase {
            Phase::Guessing(round) | Phase::SubmittingGuess(round) => (
                round.revealed_clues().to_vec(),
                round.ledger.total(),
                None,
                None,
                None,
            ),
            Phase::GeneratingImage { round, outcome } => (
                round.revealed_clues().to_vec(),
                round.ledger.total(),
                None,
                Some(*outcome),
                None,
            ),
            Phase::Revealed(reveal) | Phase::SkippedRevealed(reveal) => (
                reveal.challenge.clues().to_vec(),
                reveal.challenge.clue_count(),
                Some(reveal.challenge.title().to_string()),
                Some(reveal.outcome),
                reveal.image.clone(),
            ),
            _ => (Vec::new(), 0, None, None, None),
        };

        SessionView {
            timestamp: chrono::Utc::now(),
            phase: self.phase.name().to_string(),
            mode: self.mode.map(|m| m.to_string()),
            xp: self.counters.xp(),
            rank_name: self.counters.rank_name().to_string(),
            level: self.counters.level,
            score: self.counters.score,
            songs_correct_this_level: self.counters.songs_correct_this_level,
            songs_needed_this_level: songs_needed,
            revealed_clues,
            total_clues,
            answer,
            outcome,
            image,
            feedback: self.feedback.clone(),
            error: match &self.phase {
                Phase::Error { message } => Some(message.clone()),
                _ => None,
            },
        }
    }

    // =========================================================================
    // INTERNAL
    // =========================================================================

    /// Request the reveal image and land in the terminal reveal phase. Image
    /// failure degrades to the deterministic placeholder with a warning - the
    /// round is never failed by an image error.
    async fn resolve_round(&mut self, round: Round, outcome: RoundOutcome) {
        let prompt = round.challenge.image_prompt().to_string();
        self.phase = Phase::GeneratingImage {
            round: round.clone(),
            outcome,
        };

        let (image, degraded) = match self.image.render_image(&prompt).await {
            Ok(image) => (image, false),
            Err(e) => {
                warn!("image render failed, degrading to placeholder: {}", e);
                let note = match &self.feedback {
                    Some(f) => format!("{} (Image unavailable; placeholder shown.)", f.message),
                    None => "Image unavailable; placeholder shown.".to_string(),
                };
                self.feedback = Some(Feedback::warning(note));
                (placeholder_image(&prompt), true)
            }
        };

        let reveal = RoundReveal {
            challenge: round.challenge,
            image: Some(image),
            degraded,
            outcome,
        };
        let next = match outcome {
            RoundOutcome::Correct => Phase::Revealed(reveal),
            RoundOutcome::Skipped => Phase::SkippedRevealed(reveal),
        };
        self.set_phase(next);
    }

    /// Session level drives solo difficulty; everything else is fixed
    fn effective_difficulty(&self) -> u32 {
        match self.mode {
            Some(GameMode::Solo) => self.counters.level,
            _ => FIXED_DIFFICULTY_NON_SOLO,
        }
    }

    /// Titles the provider must not serve again: the session's set plus the
    /// saved profile's (solo)
    fn exclusion_list(&self) -> HashSet<String> {
        let mut exclude = self.counters.played_titles.clone();
        if self.mode.map(|m| m.is_solo()).unwrap_or(false) {
            if let Some(profile) = &self.profile {
                exclude.extend(profile.played_titles.iter().cloned());
            }
        }
        exclude
    }

    fn set_phase(&mut self, next: Phase) {
        debug!(from = self.phase.name(), to = next.name(), "phase transition");
        self.phase = next;
    }

    fn illegal(&self, action: &'static str) -> ValidationError {
        ValidationError::IllegalAction {
            action,
            phase: self.phase.name(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
