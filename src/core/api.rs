//! HTTP + WebSocket API for NoirGuess
//!
//! Endpoints:
//! - POST /session/new - Create new session
//! - GET /session/{id} - Get session view
//! - POST /session/{id}/start - Select a mode and start playing
//! - POST /session/{id}/lobby/start - Start the game from a lobby
//! - POST /session/{id}/guess - Submit a guess
//! - POST /session/{id}/clue - Reveal the next clue for free
//! - POST /session/{id}/hint - Buy the next clue with XP
//! - POST /session/{id}/skip - Skip the current song
//! - POST /session/{id}/next - Leave the reveal screen
//! - POST /session/{id}/continue - Dismiss the level-up screen
//! - POST /session/{id}/menu - Abandon the round back to the menu
//! - POST /session/{id}/profile/save - Persist progress
//! - POST /session/{id}/profile/clear - Delete the persisted profile
//! - WS /ws/{id} - Live session views
//! - GET /health - Health check

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::info;

use crate::core::library::SongLibrary;
use crate::core::providers::PlaceholderImages;
use crate::core::reconcile::MemoryStore;
use crate::core::session::SessionEngine;
use crate::types::{GameMode, Phase, SessionView, ValidationError};

type ApiEngine = SessionEngine<SongLibrary, PlaceholderImages, MemoryStore>;

/// One API-hosted session: the engine plus its live-update channel. Every
/// event holds the session write lock for its full duration, awaits included,
/// so no stale provider result can land after the phase has moved on.
pub struct Session {
    pub id: String,
    pub engine: ApiEngine,
    pub update_tx: broadcast::Sender<SessionView>,
}

/// App state
pub struct AppState {
    pub sessions: RwLock<HashMap<String, Session>>,
}

#[derive(Debug, Serialize)]
pub struct NewSessionResponse {
    pub session_id: String,
    pub websocket_url: String,
    pub view: SessionView,
}

#[derive(Debug, Deserialize)]
pub struct StartRequest {
    pub mode: GameMode,
}

#[derive(Debug, Deserialize)]
pub struct GuessRequest {
    pub guess: String,
}

#[derive(Debug, Serialize)]
pub struct GuessResponse {
    pub matched: bool,
    #[serde(flatten)]
    pub view: SessionView,
}

#[derive(Debug, Deserialize)]
pub struct SaveProfileRequest {
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub sessions_active: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn not_found() -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: "unknown session".to_string(),
        }),
    )
}

/// Rejected events are 422: the session exists but the event is not legal
/// right now (or its payload fails validation).
fn rejected(e: ValidationError) -> ApiError {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorBody {
            error: e.to_string(),
        }),
    )
}

/// Create the API router
pub fn create_router() -> Router {
    let state = Arc::new(AppState {
        sessions: RwLock::new(HashMap::new()),
    });

    Router::new()
        .route("/health", get(health))
        .route("/session/new", post(create_session))
        .route("/session/:id", get(get_session))
        .route("/session/:id/start", post(start_session))
        .route("/session/:id/lobby/start", post(start_lobby))
        .route("/session/:id/guess", post(submit_guess))
        .route("/session/:id/clue", post(reveal_clue))
        .route("/session/:id/hint", post(use_hint))
        .route("/session/:id/skip", post(skip_song))
        .route("/session/:id/next", post(next_stage))
        .route("/session/:id/continue", post(continue_level_up))
        .route("/session/:id/menu", post(return_to_menu))
        .route("/session/:id/profile/save", post(save_profile))
        .route("/session/:id/profile/clear", post(clear_profile))
        .route("/ws/:id", get(websocket_handler))
        .with_state(state)
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let sessions = state.sessions.read().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        sessions_active: sessions.len(),
    })
}

/// Create new session
async fn create_session(State(state): State<Arc<AppState>>) -> Json<NewSessionResponse> {
    let session_id = generate_session_id();
    let (tx, _) = broadcast::channel(100);

    let engine = SessionEngine::new(SongLibrary::new(), PlaceholderImages, MemoryStore::new());
    let view = engine.view();
    let session = Session {
        id: session_id.clone(),
        engine,
        update_tx: tx,
    };

    let mut sessions = state.sessions.write().await;
    sessions.insert(session_id.clone(), session);
    info!(session_id = %session_id, "session created");

    Json(NewSessionResponse {
        session_id: session_id.clone(),
        websocket_url: format!("/ws/{}", session_id),
        view,
    })
}

/// Get session view
async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or_else(not_found)?;
    Ok(Json(session.engine.view()))
}

/// Select a mode and start playing. Solo heads straight into the first round;
/// the other modes stop at the lobby.
async fn start_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<StartRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or_else(not_found)?;

    if matches!(session.engine.phase(), Phase::Landing) {
        session.engine.start_descent().map_err(rejected)?;
    }
    session.engine.start_session(req.mode).map_err(rejected)?;
    if matches!(session.engine.phase(), Phase::LoadingChallenge) {
        session.engine.load_next_challenge().await.map_err(rejected)?;
    }

    Ok(broadcast_view(session))
}

/// Start the game from a lobby
async fn start_lobby(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or_else(not_found)?;

    session.engine.start_lobby_game().map_err(rejected)?;
    session.engine.load_next_challenge().await.map_err(rejected)?;

    Ok(broadcast_view(session))
}

/// Submit a guess
async fn submit_guess(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<GuessRequest>,
) -> Result<Json<GuessResponse>, ApiError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or_else(not_found)?;

    let matched = session
        .engine
        .submit_guess(&req.guess)
        .await
        .map_err(rejected)?;

    let view = session.engine.view();
    let _ = session.update_tx.send(view.clone());
    Ok(Json(GuessResponse { matched, view }))
}

/// Reveal the next clue for free
async fn reveal_clue(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or_else(not_found)?;

    session.engine.reveal_next_clue().map_err(rejected)?;
    Ok(broadcast_view(session))
}

/// Buy the next clue with XP
async fn use_hint(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or_else(not_found)?;

    session.engine.use_hint().map_err(rejected)?;
    Ok(broadcast_view(session))
}

/// Skip the current song
async fn skip_song(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or_else(not_found)?;

    session.engine.skip_song().await.map_err(rejected)?;
    Ok(broadcast_view(session))
}

/// Leave the reveal screen: level-up interstitial or straight into the next
/// round.
async fn next_stage(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or_else(not_found)?;

    session.engine.proceed_to_next_stage().map_err(rejected)?;
    if matches!(session.engine.phase(), Phase::LoadingChallenge) {
        session.engine.load_next_challenge().await.map_err(rejected)?;
    }

    Ok(broadcast_view(session))
}

/// Dismiss the level-up screen and load the next round
async fn continue_level_up(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or_else(not_found)?;

    session.engine.continue_after_level_up().map_err(rejected)?;
    session.engine.load_next_challenge().await.map_err(rejected)?;

    Ok(broadcast_view(session))
}

/// Abandon the round back to the menu
async fn return_to_menu(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or_else(not_found)?;

    session.engine.return_to_menu().map_err(rejected)?;
    Ok(broadcast_view(session))
}

/// Persist progress under a username
async fn save_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<SaveProfileRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or_else(not_found)?;

    session.engine.save_profile(&req.username).map_err(rejected)?;
    Ok(broadcast_view(session))
}

/// Delete the persisted profile and reset the session counters
async fn clear_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or_else(not_found)?;

    session.engine.clear_profile();
    Ok(broadcast_view(session))
}

/// WebSocket handler for live session views
async fn websocket_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, ApiError> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or_else(not_found)?;
    let rx = session.update_tx.subscribe();
    drop(sessions);

    Ok(ws.on_upgrade(move |socket| async move {
        handle_websocket(socket, rx).await;
    }))
}

/// Handle WebSocket connection: forward session views, stop on client close
async fn handle_websocket(socket: WebSocket, mut rx: broadcast::Receiver<SessionView>) {
    let (mut sender, mut receiver) = socket.split();
    loop {
        tokio::select! {
            update = rx.recv() => {
                let Ok(view) = update else { break };
                let json = serde_json::to_string(&view).unwrap_or_default();
                if sender.send(Message::Text(json)).await.is_err() {
                    break;
                }
            }
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
        }
    }
}

fn broadcast_view(session: &Session) -> Json<SessionView> {
    let view = session.engine.view();
    let _ = session.update_tx.send(view.clone());
    Json(view)
}

/// Generate session ID
fn generate_session_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    format!("session_{:x}", nanos as u64)
}

/// Run the API server
pub async fn run_server(addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    let router = create_router();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("NoirGuess API running on {}", addr);
    println!("NoirGuess API running on {}", addr);
    println!("  POST /session/new               - Create session");
    println!("  GET  /session/:id               - Get view");
    println!("  POST /session/:id/start         - Start a mode");
    println!("  POST /session/:id/guess         - Submit a guess");
    println!("  POST /session/:id/clue          - Reveal next clue");
    println!("  POST /session/:id/hint          - Buy a hint");
    println!("  POST /session/:id/skip          - Skip the song");
    println!("  POST /session/:id/next          - Next stage");
    println!("  POST /session/:id/profile/save  - Save profile");
    println!("  WS   /ws/:id                    - Live updates");
    println!("  GET  /health                    - Health check");
    axum::serve(listener, router).await?;
    Ok(())
}
