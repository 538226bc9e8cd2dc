//! Integration tests for the full solo game flow
//!
//! Drives the engine through whole sessions with scripted providers, checking
//! the XP/score/level arithmetic and the failure semantics end to end.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use noirguess::core::{ContentProvider, ImageProvider, MemoryStore, SessionEngine};
use noirguess::types::{
    Challenge, ContentError, GameMode, ImageError, ImageRef, Phase, RoundOutcome, ValidationError,
};
use noirguess::{POINTS_PER_SONG, XP_PENALTY_FOR_SKIP, XP_PER_CORRECT_GUESS};

struct ScriptedContent {
    responses: Mutex<VecDeque<Result<Challenge, ContentError>>>,
}

impl ScriptedContent {
    fn serving(titles: &[&str]) -> Self {
        let responses = titles
            .iter()
            .map(|t| {
                Challenge::new(
                    *t,
                    vec!["first clue".to_string(), "second clue".to_string()],
                    "a neon alley",
                )
            })
            .collect::<Vec<_>>();
        Self {
            responses: Mutex::new(responses.into()),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            responses: Mutex::new(vec![Err(ContentError::Request(message.to_string()))].into()),
        }
    }
}

#[async_trait]
impl ContentProvider for ScriptedContent {
    async fn request_challenge(
        &self,
        _difficulty: u32,
        exclude_titles: &HashSet<String>,
    ) -> Result<Challenge, ContentError> {
        let next = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ContentError::Exhausted))?;
        assert!(
            !exclude_titles.contains(next.title()),
            "engine asked for an excluded title: {}",
            next.title()
        );
        Ok(next)
    }
}

struct OkImages;

#[async_trait]
impl ImageProvider for OkImages {
    async fn render_image(&self, prompt: &str) -> Result<ImageRef, ImageError> {
        Ok(ImageRef {
            url: format!("https://img.test/{}", prompt.len()),
            placeholder: false,
        })
    }
}

struct FailingImages;

#[async_trait]
impl ImageProvider for FailingImages {
    async fn render_image(&self, _prompt: &str) -> Result<ImageRef, ImageError> {
        Err(ImageError("render backend down".to_string()))
    }
}

async fn solo_engine(
    titles: &[&str],
) -> SessionEngine<ScriptedContent, OkImages, MemoryStore> {
    let mut engine =
        SessionEngine::new(ScriptedContent::serving(titles), OkImages, MemoryStore::new());
    engine.start_descent().unwrap();
    engine.start_session(GameMode::Solo).unwrap();
    engine.load_next_challenge().await.unwrap();
    engine
}

#[tokio::test]
async fn test_full_solo_loop_through_first_level() {
    // Level 1 requires 2 correct songs
    let mut engine = solo_engine(&["Song A", "Song B", "Song C"]).await;

    assert!(engine.submit_guess("Song A").await.unwrap());
    assert!(matches!(engine.phase(), Phase::Revealed(_)));
    engine.proceed_to_next_stage().unwrap();
    engine.load_next_challenge().await.unwrap();

    assert!(engine.submit_guess("song b").await.unwrap());
    engine.proceed_to_next_stage().unwrap();
    assert!(matches!(engine.phase(), Phase::LevelUp { level: 2 }));

    engine.continue_after_level_up().unwrap();
    engine.load_next_challenge().await.unwrap();
    assert!(matches!(engine.phase(), Phase::Guessing(_)));

    assert_eq!(engine.counters().xp(), 2 * XP_PER_CORRECT_GUESS);
    assert_eq!(engine.counters().score, 2 * POINTS_PER_SONG);
    assert_eq!(engine.counters().level, 2);
    assert_eq!(engine.counters().songs_correct_this_level, 0);
    assert_eq!(engine.counters().played_titles.len(), 3);
}

#[tokio::test]
async fn test_mixed_round_arithmetic() {
    let mut engine = solo_engine(&["Song A", "Song B"]).await;

    // Correct, then skip the next one
    engine.submit_guess("Song A").await.unwrap();
    engine.proceed_to_next_stage().unwrap();
    engine.load_next_challenge().await.unwrap();
    engine.skip_song().await.unwrap();

    assert_eq!(
        engine.counters().xp(),
        XP_PER_CORRECT_GUESS - XP_PENALTY_FOR_SKIP
    );
    assert_eq!(engine.counters().score, POINTS_PER_SONG);
    // Skips do not count toward the level threshold
    assert_eq!(engine.counters().songs_correct_this_level, 1);

    match engine.phase() {
        Phase::SkippedRevealed(reveal) => {
            assert_eq!(reveal.outcome, RoundOutcome::Skipped);
            assert_eq!(reveal.challenge.title(), "Song B");
        }
        other => panic!("expected SkippedRevealed, got {}", other),
    }
}

#[tokio::test]
async fn test_rank_promotion_during_play() {
    let titles: Vec<String> = (0..7).map(|i| format!("Song {}", i)).collect();
    let refs: Vec<&str> = titles.iter().map(|s| s.as_str()).collect();
    let mut engine = solo_engine(&refs).await;

    // 7 correct guesses climb past the 1000 XP rank boundary
    for (i, title) in titles.iter().enumerate() {
        assert!(engine.submit_guess(title).await.unwrap());
        if i + 1 < titles.len() {
            engine.proceed_to_next_stage().unwrap();
            if matches!(engine.phase(), Phase::LevelUp { .. }) {
                engine.continue_after_level_up().unwrap();
            }
            engine.load_next_challenge().await.unwrap();
        }
    }

    assert_eq!(engine.counters().xp(), 1050);
    assert_eq!(engine.counters().rank_name(), "Dawn Dreamer");
}

#[tokio::test]
async fn test_content_failure_blocks_until_menu_restart() {
    let mut engine = SessionEngine::new(
        ScriptedContent::failing("backend unreachable"),
        OkImages,
        MemoryStore::new(),
    );
    engine.start_descent().unwrap();
    engine.start_session(GameMode::Solo).unwrap();
    engine.load_next_challenge().await.unwrap();

    assert!(matches!(engine.phase(), Phase::Error { .. }));
    assert_eq!(engine.counters().xp(), 0);
    assert!(engine.counters().played_titles.is_empty());

    // Every round action is rejected while blocked
    assert!(engine.submit_guess("anything").await.is_err());
    assert!(engine.skip_song().await.is_err());
    assert!(engine.use_hint().is_err());

    // Explicit restart path: back to the menu, then a fresh session
    engine.return_to_menu().unwrap();
    assert!(matches!(engine.phase(), Phase::ModeSelect));
}

#[tokio::test]
async fn test_image_failure_degrades_on_both_paths() {
    let mut engine = SessionEngine::new(
        ScriptedContent::serving(&["Song A", "Song B"]),
        FailingImages,
        MemoryStore::new(),
    );
    engine.start_descent().unwrap();
    engine.start_session(GameMode::Solo).unwrap();
    engine.load_next_challenge().await.unwrap();

    engine.submit_guess("Song A").await.unwrap();
    match engine.phase() {
        Phase::Revealed(reveal) => {
            assert!(reveal.degraded);
            assert!(reveal.image.as_ref().unwrap().placeholder);
        }
        other => panic!("expected Revealed, got {}", other),
    }

    engine.proceed_to_next_stage().unwrap();
    engine.load_next_challenge().await.unwrap();
    engine.skip_song().await.unwrap();
    match engine.phase() {
        Phase::SkippedRevealed(reveal) => {
            assert!(reveal.degraded);
            assert!(reveal.image.as_ref().unwrap().placeholder);
        }
        other => panic!("expected SkippedRevealed, got {}", other),
    }
}

#[tokio::test]
async fn test_hint_economics_within_a_round() {
    let mut engine = solo_engine(&["Song A", "Song B"]).await;

    // Broke players get the insufficient-XP rejection even when clues remain
    let err = engine.use_hint().unwrap_err();
    assert!(matches!(err, ValidationError::InsufficientXp { .. }));

    // Earn XP, come back and buy the second clue
    engine.submit_guess("Song A").await.unwrap();
    engine.proceed_to_next_stage().unwrap();
    engine.load_next_challenge().await.unwrap();

    engine.use_hint().unwrap();
    assert_eq!(engine.counters().xp(), 100);

    // Both clues visible now: the exhausted rejection, balance untouched
    let err = engine.use_hint().unwrap_err();
    assert_eq!(err, ValidationError::AllCluesRevealed);
    assert_eq!(engine.counters().xp(), 100);
}

#[tokio::test]
async fn test_session_exclusion_spans_rounds() {
    // ScriptedContent asserts the engine never requests an excluded title;
    // playing three rounds exercises that assertion.
    let mut engine = solo_engine(&["Song A", "Song B", "Song C"]).await;
    for title in ["Song A", "Song B", "Song C"] {
        engine.submit_guess(title).await.unwrap();
        engine.proceed_to_next_stage().unwrap();
        if matches!(engine.phase(), Phase::LevelUp { .. }) {
            engine.continue_after_level_up().unwrap();
        }
        if matches!(engine.phase(), Phase::LoadingChallenge) {
            engine.load_next_challenge().await.unwrap();
        }
    }
    assert_eq!(engine.counters().played_titles.len(), 3);
}
