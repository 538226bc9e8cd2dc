//! Integration tests for the HTTP API
//!
//! Drives the router directly with tower's oneshot; sessions are backed by
//! the built-in song library, whose first solo-round pick is deterministic.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;
use tower::ServiceExt;

use noirguess::core::create_router;

async fn send(app: &axum::Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn new_session(app: &axum::Router) -> String {
    let (status, json) = send(app, "POST", "/session/new", None).await;
    assert_eq!(status, StatusCode::OK);
    json["session_id"].as_str().unwrap().to_string()
}

async fn start_solo(app: &axum::Router, id: &str) -> Value {
    let (status, json) = send(
        app,
        "POST",
        &format!("/session/{}/start", id),
        Some(r#"{"mode": "SOLO"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    json
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_router();
    let (status, json) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_create_session_starts_at_landing() {
    let app = create_router();
    let (status, json) = send(&app, "POST", "/session/new", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["session_id"].is_string());
    assert!(json["websocket_url"].is_string());
    assert_eq!(json["view"]["phase"], "Landing");
    assert_eq!(json["view"]["xp"], 0);
}

#[tokio::test]
async fn test_unknown_session_is_404() {
    let app = create_router();
    let (status, _) = send(&app, "GET", "/session/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "POST", "/session/nope/skip", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_start_solo_enters_guessing_with_one_clue() {
    let app = create_router();
    let id = new_session(&app).await;
    let view = start_solo(&app, &id).await;

    assert_eq!(view["phase"], "Guessing");
    assert_eq!(view["mode"], "SOLO");
    assert_eq!(view["revealed_clues"].as_array().unwrap().len(), 1);
    assert!(view["answer"].is_null(), "answer must not leak while guessing");
}

#[tokio::test]
async fn test_wrong_guess_is_200_with_matched_false() {
    let app = create_router();
    let id = new_session(&app).await;
    start_solo(&app, &id).await;

    let (status, json) = send(
        &app,
        "POST",
        &format!("/session/{}/guess", id),
        Some(r#"{"guess": "definitely wrong"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["matched"], false);
    assert_eq!(json["phase"], "Guessing");
    assert_eq!(json["xp"], 0);
}

#[tokio::test]
async fn test_correct_guess_awards_and_reveals() {
    let app = create_router();
    let id = new_session(&app).await;
    start_solo(&app, &id).await;

    // The library serves "The Hills" first for a fresh solo session
    let (status, json) = send(
        &app,
        "POST",
        &format!("/session/{}/guess", id),
        Some(r#"{"guess": "the hills"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["matched"], true);
    assert_eq!(json["phase"], "Revealed");
    assert_eq!(json["xp"], 150);
    assert_eq!(json["score"], 100);
    assert_eq!(json["answer"], "The Hills");
    assert!(json["image"]["url"].is_string());

    // /next rolls into the following round
    let (status, json) = send(&app, "POST", &format!("/session/{}/next", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["phase"], "Guessing");
}

#[tokio::test]
async fn test_hint_without_xp_is_422() {
    let app = create_router();
    let id = new_session(&app).await;
    start_solo(&app, &id).await;

    let (status, json) = send(&app, "POST", &format!("/session/{}/hint", id), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"].as_str().unwrap().contains("XP"));
}

#[tokio::test]
async fn test_skip_then_menu() {
    let app = create_router();
    let id = new_session(&app).await;
    start_solo(&app, &id).await;

    let (status, json) = send(&app, "POST", &format!("/session/{}/skip", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["phase"], "SkippedRevealed");
    assert!(json["answer"].is_string());
    assert_eq!(json["xp"], 0, "penalty saturates at zero");

    let (status, json) = send(&app, "POST", &format!("/session/{}/menu", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["phase"], "ModeSelect");
}

#[tokio::test]
async fn test_event_in_wrong_phase_is_422() {
    let app = create_router();
    let id = new_session(&app).await;

    // No round yet: guessing from Landing is rejected
    let (status, json) = send(
        &app,
        "POST",
        &format!("/session/{}/guess", id),
        Some(r#"{"guess": "x"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"].as_str().unwrap().contains("Landing"));
}

#[tokio::test]
async fn test_profile_save_validation() {
    let app = create_router();
    let id = new_session(&app).await;
    start_solo(&app, &id).await;

    let (status, json) = send(
        &app,
        "POST",
        &format!("/session/{}/profile/save", id),
        Some(r#"{"username": "   "}"#),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"].is_string());

    let (status, json) = send(
        &app,
        "POST",
        &format!("/session/{}/profile/save", id),
        Some(r#"{"username": "Echo"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["feedback"]["kind"], "success");
}

#[tokio::test]
async fn test_non_solo_parks_in_lobby() {
    let app = create_router();
    let id = new_session(&app).await;

    let (status, json) = send(
        &app,
        "POST",
        &format!("/session/{}/start", id),
        Some(r#"{"mode": "KNOCKOUT"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["phase"], "Lobby");

    let (status, json) = send(
        &app,
        "POST",
        &format!("/session/{}/lobby/start", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["phase"], "Guessing");
    // Non-solo has no level target
    assert_eq!(json["songs_needed_this_level"], 0);
}
