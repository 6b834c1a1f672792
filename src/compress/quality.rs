//! Compression tiers and their encoder quality values.
//!
//! The tier names describe how hard the user wants the image squeezed, so the
//! mapping to the encoder's quality scale is inverted: `high` compression
//! keeps the *lowest* quality.
//!
//! | tier     | quality |
//! |----------|---------|
//! | `low`    | 80      |
//! | `medium` | 60      |
//! | `high`   | 40      |

use serde::Serialize;

/// Quality used for the `low` compression tier.
pub const LOW_TIER_QUALITY: u8 = 80;

/// Quality used for the `medium` compression tier (the default).
pub const MEDIUM_TIER_QUALITY: u8 = 60;

/// Quality used for the `high` compression tier.
pub const HIGH_TIER_QUALITY: u8 = 40;

/// User-selected compression aggressiveness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionTier {
    /// Light compression, highest retained quality
    Low,

    /// Balanced compression
    #[default]
    Medium,

    /// Aggressive compression, lowest retained quality
    High,
}

impl CompressionTier {
    /// Parse a tier name leniently.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Missing or unrecognized values fall back to [`CompressionTier::Medium`].
    pub fn parse(value: Option<&str>) -> Self {
        let Some(value) = value else {
            return Self::default();
        };

        match value.trim().to_ascii_lowercase().as_str() {
            "low" => CompressionTier::Low,
            "medium" => CompressionTier::Medium,
            "high" => CompressionTier::High,
            _ => Self::default(),
        }
    }

    /// Encoder quality (0-100, higher = more fidelity) for this tier.
    pub const fn quality(&self) -> u8 {
        match self {
            CompressionTier::Low => LOW_TIER_QUALITY,
            CompressionTier::Medium => MEDIUM_TIER_QUALITY,
            CompressionTier::High => HIGH_TIER_QUALITY,
        }
    }

    /// Lowercase tier name.
    pub const fn name(&self) -> &'static str {
        match self {
            CompressionTier::Low => "low",
            CompressionTier::Medium => "medium",
            CompressionTier::High => "high",
        }
    }
}

impl std::fmt::Display for CompressionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Map a tier string to its encoder quality.
///
/// Never fails: anything other than `low`/`medium`/`high` resolves to the
/// medium quality.
#[inline]
pub fn resolve_quality(tier: &str) -> u8 {
    CompressionTier::parse(Some(tier)).quality()
}
