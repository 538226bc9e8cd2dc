//! Core types for NoirGuess

mod challenge;
mod counters;
mod error;
mod feedback;
mod mode;
mod phase;
mod profile;
mod rank;
mod view;

pub use challenge::Challenge;
pub use counters::SessionCounters;
pub use error::{ContentError, ImageError, StoreError, ValidationError};
pub use feedback::{Feedback, FeedbackKind};
pub use mode::{GameMode, LobbyPlayer, LobbyStub};
pub use phase::{ImageRef, Phase, Round, RoundOutcome, RoundReveal};
pub use profile::Profile;
pub use rank::{resolve_rank, RankingTier, RANKING_TIERS};
pub use view::SessionView;
