//! Application Service Port Interfaces

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use kindred_domain::entities::{
    Aspect, ClusterGeneration, ClusterMatch, DetailedAnalysis, JobOutput, JobPayload, Match,
    MatchFilters, MatchStrategy, ProjectIdea,
};
use kindred_domain::error::Result;

// ============================================================================
// Embedding Service Interface
// ============================================================================

/// Result of an embedding refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingRefreshOutcome {
    /// Owner of the embedding
    pub user_id: String,
    /// Vector length
    pub dimensions: usize,
    /// True when an existing embedding was kept
    pub reused: bool,
}

/// Embedding refresh operations
#[async_trait]
pub trait EmbeddingServiceInterface: Send + Sync {
    /// Regenerate `user_id`'s embedding from their profile document.
    ///
    /// Without `force_refresh` an existing embedding is kept.
    async fn refresh(&self, user_id: &str, force_refresh: bool) -> Result<EmbeddingRefreshOutcome>;
}

// ============================================================================
// Matching Service Interface
// ============================================================================

/// A scored pair plus the material descriptive views are built from
#[derive(Debug, Clone, PartialEq)]
pub struct PairInsight {
    /// The scored pairing
    pub scored: Match,
    /// Personal-planet aspects used for harmony
    pub aspects: Vec<Aspect>,
    /// Traits both users hold
    pub shared_traits: Vec<String>,
}

/// Matching operations
#[async_trait]
pub trait MatchingServiceInterface: Send + Sync {
    /// Ranked matches for `user_id`, served from the cache when possible
    async fn find_matches(
        &self,
        user_id: &str,
        strategy: MatchStrategy,
        limit: usize,
        filters: &MatchFilters,
    ) -> Result<Vec<Match>>;

    /// Recompute and re-cache `user_id`'s unfiltered match list, recording it
    async fn recalculate(
        &self,
        user_id: &str,
        strategy: MatchStrategy,
        limit: usize,
    ) -> Result<Vec<Match>>;

    /// Score one pair directly
    async fn score_pair(&self, user_id: &str, target_id: &str) -> Result<PairInsight>;

    /// Full breakdown and narrative for one pair
    async fn analysis(&self, user_id: &str, target_id: &str) -> Result<DetailedAnalysis>;

    /// Upsert `user_id`'s interest in `target_id`
    async fn save_interest(&self, user_id: &str, target_id: &str, interested: bool) -> Result<()>;
}

// ============================================================================
// Cluster Service Interface
// ============================================================================

/// Cluster operations
#[async_trait]
pub trait ClusterServiceInterface: Send + Sync {
    /// Recluster the population and replace the current generation
    async fn recompute(&self) -> Result<ClusterGeneration>;

    /// Cross-cluster recommendations for `user_id`
    async fn similar_clusters(&self, user_id: &str) -> Result<Vec<ClusterMatch>>;
}

// ============================================================================
// Project Service Interface
// ============================================================================

/// Project generation operations
#[async_trait]
pub trait ProjectServiceInterface: Send + Sync {
    /// Generate, score and store `count` project ideas for a pair
    async fn generate(&self, user_id: &str, partner_id: &str, count: usize) -> Result<Vec<ProjectIdea>>;
}

// ============================================================================
// Job Executor
// ============================================================================

/// Runs the computation behind a job payload
///
/// The orchestrator owns scheduling, retries and cache invalidation; the
/// executor only performs one attempt.
#[async_trait]
pub trait JobExecutor: Send + Sync {
    /// Perform one attempt of `payload`
    async fn execute(&self, payload: &JobPayload) -> Result<JobOutput>;
}
