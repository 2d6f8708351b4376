//! Main application configuration

use serde::{Deserialize, Serialize};

use kindred_application::jobs::JobPolicies;
use kindred_domain::value_objects::{ClusteringConfig, ScoringConfig, SimilarityConfig};

pub use super::cache::CacheConfig;
pub use super::logging::LoggingConfig;
pub use super::providers::{EmbeddingSettings, NarrativeSettings, ProvidersConfig};
pub use super::timeouts::TimeoutsConfig;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Match cache backend and TTLs
    pub cache: CacheConfig,
    /// Similarity ranking thresholds
    pub similarity: SimilarityConfig,
    /// Clustering parameters
    pub clustering: ClusteringConfig,
    /// Score fusion weights and lookup tables
    pub scoring: ScoringConfig,
    /// Per-kind job concurrency and retry
    pub jobs: JobPolicies,
    /// I/O deadlines
    pub timeouts: TimeoutsConfig,
    /// External collaborator selection
    pub providers: ProvidersConfig,
}
