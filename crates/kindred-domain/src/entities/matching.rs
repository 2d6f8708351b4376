//! Match entities and request parameters

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::personality::TraitPair;
use crate::error::Error;

/// How candidates are ranked before scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// Productive difference: similarity inside a target band
    Complementary,
    /// Closest profiles first
    Similar,
    /// Average of the similar and complementary rankings
    Balanced,
}

impl MatchStrategy {
    /// All strategies
    pub const ALL: [Self; 3] = [Self::Complementary, Self::Similar, Self::Balanced];

    /// Lowercase name, as used in cache keys
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Complementary => "complementary",
            Self::Similar => "similar",
            Self::Balanced => "balanced",
        }
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| Error::invalid_argument(format!("unknown match strategy: {s}")))
    }
}

/// Quality band of a combined score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// Top band
    Excellent,
    /// Second band
    Strong,
    /// Third band
    Good,
    /// Fourth band
    Moderate,
    /// Everything below the ladder
    Basic,
}

impl MatchType {
    /// Lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Strong => "strong",
            Self::Good => "good",
            Self::Moderate => "moderate",
            Self::Basic => "basic",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every intermediate value that went into a match score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Raw cosine similarity, absent when either embedding is missing
    pub similarity: Option<f64>,
    /// Element table lookup
    pub element_compat: f64,
    /// Share of harmonic aspects among personal-planet aspects
    pub aspect_harmony: f64,
    /// Number of personal-planet aspects considered
    pub aspect_count: usize,
    /// Archetype table lookup
    pub archetype_compat: f64,
    /// Colour table lookup
    pub color_compat: f64,
    /// Share of complementary trait pairs present across the two users
    pub trait_complementarity: f64,
    /// The complementary pairs that were found
    pub complementary_pairs: Vec<TraitPair>,
    /// Both embeddings were available
    pub embedding_available: bool,
    /// Both symbolic summaries were available
    pub astro_available: bool,
    /// Both personality profiles were available
    pub personality_available: bool,
}

/// A scored pairing
///
/// Derived on demand; persisted only as cache entries and audit records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Requesting user
    pub user_id: String,
    /// Candidate user
    pub target_id: String,
    /// Embedding similarity component, `[0, 1]`
    pub vector_score: f64,
    /// Astrological synergy component, `[0, 1]`
    pub astro_score: f64,
    /// Personality complementarity component, `[0, 1]`
    pub personality_score: f64,
    /// Weighted fusion of the components, `[0, 1]`
    pub combined_score: f64,
    /// Band of the combined score
    pub match_type: MatchType,
    /// Intermediate values
    pub breakdown: ScoreBreakdown,
}

/// Post-scoring filters of a match request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchFilters {
    /// Drop matches whose combined score is below this value
    #[serde(default)]
    pub min_score: Option<f64>,
    /// Keep only these bands (all bands when absent)
    #[serde(default)]
    pub match_types: Option<Vec<MatchType>>,
    /// Keep only matches where both symbolic summaries were available
    #[serde(default)]
    pub require_astro_data: bool,
    /// Restrict the candidate pool to one user
    #[serde(default)]
    pub target_id: Option<String>,
}

impl MatchFilters {
    /// Filters that keep everything
    pub fn none() -> Self {
        Self::default()
    }

    /// Set the minimum combined score
    #[must_use]
    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = Some(min_score);
        self
    }

    /// Restrict to the given bands
    #[must_use]
    pub fn with_match_types<I: IntoIterator<Item = MatchType>>(mut self, types: I) -> Self {
        self.match_types = Some(types.into_iter().collect());
        self
    }

    /// Require astrological data on both sides
    #[must_use]
    pub fn requiring_astro_data(mut self) -> Self {
        self.require_astro_data = true;
        self
    }

    /// Restrict to a single candidate
    #[must_use]
    pub fn for_target<S: Into<String>>(mut self, target_id: S) -> Self {
        self.target_id = Some(target_id.into());
        self
    }

    /// Equivalent filters in canonical form (band list sorted, deduplicated)
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut normalized = self.clone();
        if let Some(types) = normalized.match_types.as_mut() {
            types.sort_unstable();
            types.dedup();
        }
        normalized
    }

    /// Whether `candidate` passes every filter
    pub fn accepts(&self, candidate: &Match) -> bool {
        if self
            .min_score
            .is_some_and(|min| candidate.combined_score < min)
        {
            return false;
        }
        if self
            .match_types
            .as_ref()
            .is_some_and(|types| !types.contains(&candidate.match_type))
        {
            return false;
        }
        if self.require_astro_data && !candidate.breakdown.astro_available {
            return false;
        }
        self.target_id
            .as_deref()
            .is_none_or(|target| target == candidate.target_id)
    }
}

/// A user's stated interest in a candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchInterest {
    /// The user expressing interest
    pub user_id: String,
    /// The candidate
    pub target_id: String,
    /// Interested or not
    pub interested: bool,
    /// Last write time
    pub updated_at: DateTime<Utc>,
}

/// Audit record of a match recalculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Identity of the record
    pub record_id: String,
    /// User the list was computed for
    pub user_id: String,
    /// Strategy used
    pub strategy: MatchStrategy,
    /// Requested limit
    pub limit: usize,
    /// The computed list
    pub matches: Vec<Match>,
    /// Computation time
    pub created_at: DateTime<Utc>,
}
