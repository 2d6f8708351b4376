//! Similarity index
//!
//! Ranks a candidate set against a query vector in one of three modes:
//!
//! - `similar`: cosine similarity descending, dropping candidates below the
//!   threshold.
//! - `complementary`: only candidates whose similarity falls inside the
//!   target band, ranked by closeness to the middle of the band.
//! - `balanced`: candidates with at least the band's lower bound of common
//!   ground, ranked by the mean of their similar and complementary scores.
//!
//! Ties are broken by ascending user id. Fewer than `k` qualifying
//! candidates is not an error.

use std::cmp::Ordering;

use kindred_domain::entities::{MatchStrategy, UserEmbedding};
use kindred_domain::error::Result;
use kindred_domain::value_objects::SimilarityConfig;

use super::vector_math::cosine_similarity;

/// A candidate kept by the index
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate {
    /// Candidate user
    pub user_id: String,
    /// Raw cosine similarity to the query
    pub similarity: f64,
    /// Mode-specific ordering score, higher first
    pub rank_score: f64,
}

/// Top-K ranking over embeddings
#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarityIndex {
    config: SimilarityConfig,
}

impl SimilarityIndex {
    /// Create an index with the given thresholds
    pub fn new(config: SimilarityConfig) -> Self {
        Self { config }
    }

    /// Thresholds in use
    pub fn config(&self) -> &SimilarityConfig {
        &self.config
    }

    /// How close `similarity` sits to the middle of the complementary band.
    ///
    /// 1 at the centre, falling linearly to 0 at the band edges and 0
    /// outside the band.
    pub fn complementarity(&self, similarity: f64) -> f64 {
        let half_width = (self.config.band_max - self.config.band_min) / 2.0;
        let offset = (similarity - self.config.band_center()).abs();
        if half_width <= 0.0 {
            return if offset == 0.0 { 1.0 } else { 0.0 };
        }
        (1.0 - offset / half_width).max(0.0)
    }

    fn in_band(&self, similarity: f64) -> bool {
        (self.config.band_min..=self.config.band_max).contains(&similarity)
    }

    /// Mode score of a candidate, or `None` when the mode drops it
    fn rank(&self, similarity: f64, mode: MatchStrategy) -> Option<f64> {
        match mode {
            MatchStrategy::Similar => (similarity >= self.config.threshold).then_some(similarity),
            MatchStrategy::Complementary => self
                .in_band(similarity)
                .then(|| self.complementarity(similarity)),
            MatchStrategy::Balanced => (similarity >= self.config.band_min)
                .then(|| (similarity + self.complementarity(similarity)) / 2.0),
        }
    }

    /// Best `k` candidates for `query` under `mode`.
    ///
    /// Fails with `DimensionMismatch` if any candidate's vector length
    /// differs from the query's.
    pub fn top_k(
        &self,
        query: &[f32],
        candidates: &[UserEmbedding],
        k: usize,
        mode: MatchStrategy,
    ) -> Result<Vec<RankedCandidate>> {
        let mut ranked = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let similarity = cosine_similarity(query, &candidate.vector)?;
            if let Some(rank_score) = self.rank(similarity, mode) {
                ranked.push(RankedCandidate {
                    user_id: candidate.user_id.clone(),
                    similarity,
                    rank_score,
                });
            }
        }
        ranked.sort_by(compare_ranked);
        ranked.truncate(k);
        Ok(ranked)
    }
}

fn compare_ranked(a: &RankedCandidate, b: &RankedCandidate) -> Ordering {
    b.rank_score
        .total_cmp(&a.rank_score)
        .then_with(|| a.user_id.cmp(&b.user_id))
}
