//! Provider seams: challenge content and image rendering
//!
//! The engine only suspends at these two calls. Content failures are fatal to
//! the round; image failures are degraded by the engine to the deterministic
//! placeholder from [`placeholder_image`].

use std::collections::HashSet;

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::types::{Challenge, ContentError, ImageError, ImageRef};

/// Supplies one challenge per request at the given difficulty, avoiding the
/// excluded titles.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    async fn request_challenge(
        &self,
        difficulty: u32,
        exclude_titles: &HashSet<String>,
    ) -> Result<Challenge, ContentError>;
}

/// Turns an image prompt into a displayable reference. Failures are reported
/// so the caller can degrade; they never fail a round.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    async fn render_image(&self, prompt: &str) -> Result<ImageRef, ImageError>;
}

/// Deterministic fallback image for a prompt: the same prompt always maps to
/// the same placeholder URL (seeded by a prompt digest).
pub fn placeholder_image(prompt: &str) -> ImageRef {
    let mut hasher = Sha256::new();
    hasher.update(prompt.as_bytes());
    let digest = hasher.finalize();
    let seed: String = digest[..8].iter().map(|b| format!("{:02x}", b)).collect();
    ImageRef {
        url: format!("https://picsum.photos/seed/{}/800/450?grayscale&blur=2", seed),
        placeholder: true,
    }
}

/// Image provider that serves placeholders only - the offline default for the
/// CLI and the API sessions.
#[derive(Debug, Default)]
pub struct PlaceholderImages;

#[async_trait]
impl ImageProvider for PlaceholderImages {
    async fn render_image(&self, prompt: &str) -> Result<ImageRef, ImageError> {
        Ok(placeholder_image(prompt))
    }
}

// =============================================================================
// TESTS
// =============================================================================
