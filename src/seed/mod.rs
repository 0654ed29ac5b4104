//! Seed Mapping Module
//!
//! Pure, deterministic translation of free-text keywords into a catalog
//! query ([`SeedSpec`]), plus the stable cache keys derived from them.

mod fallback;
mod keys;
mod mapper;
mod tables;

use serde::{Deserialize, Serialize};

pub use fallback::{heuristic_keywords, MAX_FALLBACK_KEYWORDS};
pub use keys::{keyword_cache_key, message_cache_key};
pub use mapper::{derive_seed_spec, normalize_keywords};

/// Most seed genres a query may carry
pub const MAX_SEED_GENRES: usize = 5;

// == Feature Target ==
/// Target value for an audio feature with an optional bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureTarget {
    pub target: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl FeatureTarget {
    pub const fn at_least(target: f64, min: f64) -> Self {
        Self {
            target,
            min: Some(min),
            max: None,
        }
    }

    pub const fn at_most(target: f64, max: f64) -> Self {
        Self {
            target,
            min: None,
            max: Some(max),
        }
    }
}

// == Seed Spec ==
/// Normalized catalog query derived from user keywords.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeedSpec {
    /// Up to five genres, first-seen order
    pub genres: Vec<String>,
    pub energy: Option<FeatureTarget>,
    pub valence: Option<FeatureTarget>,
    /// Beats per minute
    pub tempo: Option<FeatureTarget>,
}

impl SeedSpec {
    /// Audio features that are set, keyed by catalog feature name.
    pub fn features(&self) -> impl Iterator<Item = (&'static str, FeatureTarget)> {
        [
            ("energy", self.energy),
            ("valence", self.valence),
            ("tempo", self.tempo),
        ]
        .into_iter()
        .filter_map(|(name, target)| target.map(|t| (name, t)))
    }

    pub fn is_empty(&self) -> bool {
        self.genres.is_empty() && self.features().next().is_none()
    }
}
