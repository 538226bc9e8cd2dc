//! Profile reconciliation and persistence
//!
//! Merges session-accumulated progress into the durable profile on explicit
//! save, and seeds a session from a loaded profile at startup. Store failures
//! never reach game state; they surface as notices.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::warn;

use crate::types::{Profile, SessionCounters, StoreError, ValidationError};

/// Persistence seam for the durable profile record
pub trait ProfileStore: Send + Sync {
    fn load(&self) -> Result<Option<Profile>, StoreError>;
    fn save(&self, profile: &Profile) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

/// Pretty-printed JSON file store
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProfileStore for JsonFileStore {
    fn load(&self) -> Result<Option<Profile>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&self.path)?;
        let profile: Profile = serde_json::from_str(&json)?;
        Ok(Some(profile))
    }

    fn save(&self, profile: &Profile) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(profile)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// In-memory store for API sessions and tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    record: Mutex<Option<Profile>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProfileStore for MemoryStore {
    fn load(&self) -> Result<Option<Profile>, StoreError> {
        Ok(self.record.lock().unwrap().clone())
    }

    fn save(&self, profile: &Profile) -> Result<(), StoreError> {
        *self.record.lock().unwrap() = Some(profile.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.record.lock().unwrap() = None;
        Ok(())
    }
}

/// Mediates between session counters and the profile store
pub struct ProfileReconciler<S: ProfileStore> {
    store: S,
}

impl<S: ProfileStore> ProfileReconciler<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Startup load. Absent or unreadable records degrade to `None` so a
    /// corrupt store never blocks startup; partial records degrade per-field
    /// through serde defaults and `Profile::normalize`.
    pub fn load(&self) -> Option<Profile> {
        match self.store.load() {
            Ok(Some(profile)) => Some(profile.normalize()),
            Ok(None) => None,
            Err(e) => {
                warn!("profile load failed, starting fresh: {}", e);
                None
            }
        }
    }

    /// Build the merged profile from the current counters: the played-title
    /// set is the union of the existing profile's set and the session's.
    /// Pure; rejects an empty username before any store access.
    pub fn merge(
        username: &str,
        counters: &SessionCounters,
        existing: Option<&Profile>,
    ) -> Result<Profile, ValidationError> {
        if username.trim().is_empty() {
            return Err(ValidationError::EmptyUsername);
        }

        let mut profile = Profile::new(username.trim());
        profile.xp = counters.xp();
        profile.level = counters.level;
        profile.rank_name = counters.rank_name().to_string();
        profile.played_titles = counters.played_titles.clone();
        if let Some(existing) = existing {
            profile
                .played_titles
                .extend(existing.played_titles.iter().cloned());
        }
        Ok(profile)
    }

    /// Write the profile. Callers surface a failure as a notice, never as a
    /// session error.
    pub fn persist(&self, profile: &Profile) -> Result<(), StoreError> {
        self.store.save(profile)
    }

    /// Delete the persisted record
    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.clear()
    }
}

// =============================================================================
// TESTS
// =============================================================================
