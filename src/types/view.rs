//! Serializable session snapshot for display surfaces

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::{Feedback, ImageRef, RoundOutcome};

/// One observable snapshot of the session, built by the engine after every
/// event; what the CLI renders and the HTTP/WS surface serves.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub timestamp: DateTime<Utc>,
    pub phase: String,
    pub mode: Option<String>,
    pub xp: u64,
    pub rank_name: String,
    pub level: u32,
    pub score: u64,
    pub songs_correct_this_level: u32,
    pub songs_needed_this_level: u32,
    /// Clues visible so far, in reveal order (empty outside a round)
    pub revealed_clues: Vec<String>,
    pub total_clues: usize,
    /// Answer title, only present once the round is resolved
    pub answer: Option<String>,
    pub outcome: Option<RoundOutcome>,
    pub image: Option<ImageRef>,
    pub feedback: Option<Feedback>,
    pub error: Option<String>,
}

impl SessionView {
    /// Compact single-line status for plain terminal output
    pub fn to_parseable_string(&self) -> String {
        format!(
            "phase={} | xp={} | rank={} | level={} | progress={}/{} | clues={}/{}",
            self.phase,
            self.xp,
            self.rank_name,
            self.level,
            self.songs_correct_this_level,
            self.songs_needed_this_level,
            self.revealed_clues.len(),
            self.total_clues,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parseable_string() {
        let view = SessionView {
            timestamp: Utc::now(),
            phase: "Guessing".to_string(),
            mode: Some("SOLO".to_string()),
            xp: 150,
            rank_name: "Bronze Listener".to_string(),
            level: 1,
            score: 100,
            songs_correct_this_level: 1,
            songs_needed_this_level: 2,
            revealed_clues: vec!["a whisper".to_string()],
            total_clues: 3,
            answer: None,
            outcome: None,
            image: None,
            feedback: None,
            error: None,
        };
        assert_eq!(
            view.to_parseable_string(),
            "phase=Guessing | xp=150 | rank=Bronze Listener | level=1 | progress=1/2 | clues=1/3"
        );
    }
}
