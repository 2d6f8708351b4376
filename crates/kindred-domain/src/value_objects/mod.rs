//! Domain Value Objects
//!
//! Immutable values without identity. The configuration values here are
//! loaded once at start-up and shared read-only by every service.
//!
//! | Value Object | Description |
//! |--------------|-------------|
//! | [`Embedding`] | Vector produced by an embedding generator |
//! | [`SimilarityConfig`] | Thresholds of the ranking modes |
//! | [`ClusteringConfig`] | k-means and elbow parameters |
//! | [`ScoringConfig`] | Weights and lookup tables of the scorer |

/// Algorithm configuration value objects
pub mod config;
/// Embedding vector value object
pub mod embedding;
/// Scoring weights and tables
pub mod scoring;

pub use config::{ClusteringConfig, SimilarityConfig};
pub use embedding::Embedding;
pub use scoring::{
    AstroWeights, CompatibilityTable, FusionWeights, MatchTypeLadder, PersonalityWeights,
    ScoringConfig,
};
