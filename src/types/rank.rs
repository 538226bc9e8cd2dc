//! Ranking tiers and the pure XP → tier resolver

use serde::Serialize;

/// One entry of the static ranking table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RankingTier {
    /// Tier name shown to the player
    pub name: &'static str,
    /// Minimum cumulative XP to hold this tier
    pub min_xp: u64,
    /// Optional badge glyph
    pub badge: Option<&'static str>,
}

/// Static ranking table [C] - min_xp strictly increasing, zero-floor first tier
pub const RANKING_TIERS: &[RankingTier] = &[
    RankingTier { name: "Bronze Listener", min_xp: 0, badge: Some("🎧") },
    RankingTier { name: "Dawn Dreamer", min_xp: 1000, badge: Some("🌒") },
    RankingTier { name: "Trilogy OG", min_xp: 2500, badge: Some("🌑") },
    RankingTier { name: "After Hours Architect", min_xp: 5000, badge: Some("🩸") },
    RankingTier { name: "XO Legend", min_xp: 10000, badge: Some("⚡") },
];

/// Resolve cumulative XP to the highest tier whose threshold it meets.
///
/// Scans from the top of the table down; the zero-floor tier guarantees a
/// match, so this is total. Pure, no side effects.
pub fn resolve_rank(xp: u64) -> &'static RankingTier {
    for tier in RANKING_TIERS.iter().rev() {
        if xp >= tier.min_xp {
            return tier;
        }
    }
    &RANKING_TIERS[0]
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_thresholds_strictly_increase() {
        for pair in RANKING_TIERS.windows(2) {
            assert!(pair[0].min_xp < pair[1].min_xp);
        }
        assert_eq!(RANKING_TIERS[0].min_xp, 0);
    }

    #[test]
    fn test_resolve_at_zero() {
        assert_eq!(resolve_rank(0).name, "Bronze Listener");
    }

    #[test]
    fn test_resolve_below_first_threshold() {
        assert_eq!(resolve_rank(999).name, "Bronze Listener");
    }

    #[test]
    fn test_resolve_exact_thresholds() {
        assert_eq!(resolve_rank(1000).name, "Dawn Dreamer");
        assert_eq!(resolve_rank(2500).name, "Trilogy OG");
        assert_eq!(resolve_rank(5000).name, "After Hours Architect");
        assert_eq!(resolve_rank(10000).name, "XO Legend");
    }

    #[test]
    fn test_resolve_saturates_at_top_tier() {
        assert_eq!(resolve_rank(50000).name, "XO Legend");
        assert_eq!(resolve_rank(u64::MAX).name, "XO Legend");
    }

    #[test]
    fn test_resolve_between_thresholds() {
        assert_eq!(resolve_rank(2499).name, "Dawn Dreamer");
        assert_eq!(resolve_rank(9999).name, "After Hours Architect");
    }
}
