//! Algorithm configuration value objects

use serde::{Deserialize, Serialize};

use crate::constants::{
    CANDIDATE_POOL_MULTIPLIER, CLUSTER_DOMINANT_TRAITS_MAX, CLUSTER_MATCHES_MAX,
    CLUSTER_REPRESENTATIVES_MAX, CLUSTER_REPRESENTATIVES_MIN, CLUSTER_SIMILARITY_FLOOR,
    CLUSTERING_CONVERGENCE_TOLERANCE, CLUSTERING_MAX_ITERATIONS, CLUSTERING_MAX_K,
    CLUSTERING_MIN_POPULATION, COMPLEMENTARY_BAND_MAX_DEFAULT, COMPLEMENTARY_BAND_MIN_DEFAULT,
    SIMILARITY_THRESHOLD_DEFAULT,
};
use crate::error::{Error, Result};

/// Ranking thresholds of the similarity index
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    /// Minimum similarity kept by the `similar` mode
    pub threshold: f64,
    /// Lower bound of the complementary band
    pub band_min: f64,
    /// Upper bound of the complementary band
    pub band_max: f64,
    /// Candidate pool = limit * multiplier
    pub pool_multiplier: usize,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            threshold: SIMILARITY_THRESHOLD_DEFAULT,
            band_min: COMPLEMENTARY_BAND_MIN_DEFAULT,
            band_max: COMPLEMENTARY_BAND_MAX_DEFAULT,
            pool_multiplier: CANDIDATE_POOL_MULTIPLIER,
        }
    }
}

impl SimilarityConfig {
    /// Midpoint of the complementary band, the ideal complementary similarity
    pub fn band_center(&self) -> f64 {
        (self.band_min + self.band_max) / 2.0
    }

    /// Validate ranges
    pub fn validate(&self) -> Result<()> {
        if !(-1.0..=1.0).contains(&self.threshold) {
            return Err(Error::configuration(
                "similarity threshold must be within [-1, 1]",
            ));
        }
        if !(-1.0..=1.0).contains(&self.band_min)
            || !(-1.0..=1.0).contains(&self.band_max)
            || self.band_min > self.band_max
        {
            return Err(Error::configuration(
                "complementary band must satisfy -1 <= min <= max <= 1",
            ));
        }
        if self.pool_multiplier == 0 {
            return Err(Error::configuration("pool_multiplier must be at least 1"));
        }
        Ok(())
    }
}

/// Parameters of the clustering engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Largest k evaluated by the elbow heuristic
    pub max_k: usize,
    /// Iteration cap of a k-means run
    pub max_iterations: usize,
    /// Convergence threshold on the largest centroid movement
    pub tolerance: f64,
    /// Smallest population accepted
    pub min_population: usize,
    /// Representatives per cluster, clamped to `3..=5`
    pub representatives: usize,
    /// Dominant traits per cluster
    pub dominant_traits: usize,
    /// Centroid similarity floor for cross-cluster recommendations
    pub similarity_floor: f64,
    /// Most cross-cluster recommendations returned
    pub max_cluster_matches: usize,
    /// Seed of the centroid sampler; random when absent
    pub seed: Option<u64>,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            max_k: CLUSTERING_MAX_K,
            max_iterations: CLUSTERING_MAX_ITERATIONS,
            tolerance: CLUSTERING_CONVERGENCE_TOLERANCE,
            min_population: CLUSTERING_MIN_POPULATION,
            representatives: CLUSTER_REPRESENTATIVES_MAX,
            dominant_traits: CLUSTER_DOMINANT_TRAITS_MAX,
            similarity_floor: CLUSTER_SIMILARITY_FLOOR,
            max_cluster_matches: CLUSTER_MATCHES_MAX,
            seed: None,
        }
    }
}

impl ClusteringConfig {
    /// Configured representative count clamped to the allowed range
    pub fn representative_count(&self) -> usize {
        self.representatives
            .clamp(CLUSTER_REPRESENTATIVES_MIN, CLUSTER_REPRESENTATIVES_MAX)
    }

    /// Use a fixed sampler seed
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate ranges
    pub fn validate(&self) -> Result<()> {
        if self.max_k < 2 {
            return Err(Error::configuration("clustering max_k must be at least 2"));
        }
        if self.max_iterations == 0 {
            return Err(Error::configuration(
                "clustering max_iterations must be at least 1",
            ));
        }
        if self.tolerance <= 0.0 {
            return Err(Error::configuration("clustering tolerance must be positive"));
        }
        if self.min_population < 4 {
            return Err(Error::configuration(
                "clustering min_population must be at least 4",
            ));
        }
        if !(-1.0..=1.0).contains(&self.similarity_floor) {
            return Err(Error::configuration(
                "cluster similarity floor must be within [-1, 1]",
            ));
        }
        Ok(())
    }
}
