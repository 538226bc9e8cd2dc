//! Game modes and the inert multiplayer lobby stub

use serde::{Deserialize, Serialize};

/// Selected game mode. Only `Solo` drives level progression; the other modes
/// share the round loop at a fixed difficulty and their lobby state is a
/// placeholder with no networking behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameMode {
    Solo,
    GroupChallenge,
    Knockout,
    RankLadder,
}

impl GameMode {
    pub fn is_solo(&self) -> bool {
        matches!(self, GameMode::Solo)
    }
}

impl std::fmt::Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GameMode::Solo => "SOLO",
            GameMode::GroupChallenge => "GROUP_CHALLENGE",
            GameMode::Knockout => "KNOCKOUT",
            GameMode::RankLadder => "RANK_LADDER",
        };
        write!(f, "{}", name)
    }
}

/// Placeholder lobby participant
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LobbyPlayer {
    pub id: String,
    pub name: String,
    pub score: u64,
    pub is_ready: bool,
    pub is_eliminated: bool,
}

/// Inert lobby/room state for the non-solo modes. Never exercised by any
/// game-logic transition; pure navigation data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LobbyStub {
    pub mode: GameMode,
    pub room_code: Option<String>,
    pub players: Vec<LobbyPlayer>,
    pub is_host: bool,
}

impl LobbyStub {
    pub fn new(mode: GameMode) -> Self {
        Self {
            mode,
            room_code: None,
            players: Vec::new(),
            is_host: false,
        }
    }
}
