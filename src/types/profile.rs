//! Durable player profile
//!
//! Persistence is opt-in: the profile is only written on an explicit save and
//! only read at startup. Loading is deliberately forgiving - every field
//! defaults individually, so a partial or hand-edited record degrades to
//! defaults instead of blocking startup.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::resolve_rank;
use crate::{INITIAL_LEVEL, INITIAL_XP};

fn default_username() -> String {
    "Agent X".to_string()
}

fn default_level() -> u32 {
    INITIAL_LEVEL
}

// Lenient field readers: a wrong-typed field degrades to its default instead
// of failing the whole record. Missing fields are handled by serde(default).

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match serde_json::Value::deserialize(d)? {
        serde_json::Value::String(s) => s,
        _ => String::new(),
    })
}

fn lenient_u64<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    Ok(serde_json::Value::deserialize(d)?.as_u64().unwrap_or(0))
}

fn lenient_level<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    Ok(serde_json::Value::deserialize(d)?
        .as_u64()
        .map(|v| v.min(u32::MAX as u64) as u32)
        .unwrap_or(INITIAL_LEVEL))
}

fn lenient_titles<'de, D: Deserializer<'de>>(d: D) -> Result<HashSet<String>, D::Error> {
    Ok(match serde_json::Value::deserialize(d)? {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect(),
        _ => HashSet::new(),
    })
}

fn lenient_timestamp<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
    let value = serde_json::Value::deserialize(d)?;
    Ok(serde_json::from_value(value).unwrap_or_else(|_| Utc::now()))
}

/// Cross-session player record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    #[serde(default = "default_username", deserialize_with = "lenient_string")]
    pub username: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub xp: u64,
    #[serde(default = "default_level", deserialize_with = "lenient_level")]
    pub level: u32,
    #[serde(default, deserialize_with = "lenient_string")]
    pub rank_name: String,
    #[serde(default, deserialize_with = "lenient_titles")]
    pub played_titles: HashSet<String>,
    /// Stamped on every save
    #[serde(default = "Utc::now", deserialize_with = "lenient_timestamp")]
    pub saved_at: DateTime<Utc>,
}

impl Profile {
    /// Fresh profile for a first save
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            xp: INITIAL_XP,
            level: INITIAL_LEVEL,
            rank_name: resolve_rank(INITIAL_XP).name.to_string(),
            played_titles: HashSet::new(),
            saved_at: Utc::now(),
        }
    }

    /// Repair a loaded record: blank username falls back to the default, the
    /// level floor is 1, and the rank is recomputed from XP so the
    /// `rank == resolve_rank(xp)` invariant holds even for records saved by
    /// older builds.
    pub fn normalize(mut self) -> Self {
        if self.username.trim().is_empty() {
            self.username = default_username();
        }
        self.level = self.level.max(1);
        self.rank_name = resolve_rank(self.xp).name.to_string();
        self
    }
}

// =============================================================================
// TESTS
// =============================================================================
