//! Core engines for NoirGuess

pub mod api;
pub mod content;
pub mod guess;
pub mod ledger;
pub mod library;
pub mod providers;
pub mod reconcile;
pub mod session;

pub use api::{create_router, run_server};
pub use content::parse_challenge_json;
pub use guess::{guess_matches, normalize_guess};
pub use ledger::ClueLedger;
pub use library::SongLibrary;
pub use providers::{placeholder_image, ContentProvider, ImageProvider, PlaceholderImages};
pub use reconcile::{JsonFileStore, MemoryStore, ProfileReconciler, ProfileStore};
pub use session::SessionEngine;
