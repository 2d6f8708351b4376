//! Engine facade
//!
//! In-process entry point for every engine operation. Synchronous reads go
//! straight to the services; batch work is submitted to the job
//! orchestrator and returned as a trackable [`JobHandle`].

use std::sync::Arc;

use tracing::debug;

use kindred_application::jobs::JobHandle;
use kindred_domain::entities::{
    ClusterAnalysis, ClusterMatch, DetailedAnalysis, Job, JobOutput, JobPayload, Match,
    MatchFilters, MatchStrategy,
};
use kindred_domain::error::{Error, Result};
use kindred_domain::ports::{CacheStats, SymbolicSummaryProvider};
use kindred_infrastructure::bootstrap::{AppContext, Repositories, init_app, init_app_with};
use kindred_infrastructure::config::{AppConfig, ConfigLoader};

/// The matching and clustering engine
#[derive(Debug)]
pub struct Engine {
    context: AppContext,
}

impl Engine {
    /// Build an engine with process-local persistence
    pub fn new(config: AppConfig) -> Result<Self> {
        Ok(Self::from_context(init_app(config)?))
    }

    /// Build an engine from layered configuration
    pub fn from_loader(loader: &ConfigLoader) -> Result<Self> {
        Self::new(loader.load()?)
    }

    /// Build an engine over the given persistence and symbolic summaries
    pub fn with_collaborators(
        config: AppConfig,
        repositories: Repositories,
        symbolic: Arc<dyn SymbolicSummaryProvider>,
    ) -> Result<Self> {
        Ok(Self::from_context(init_app_with(
            config,
            repositories,
            symbolic,
        )?))
    }

    /// Wrap an already wired context
    pub fn from_context(context: AppContext) -> Self {
        Self { context }
    }

    /// Wired components
    pub fn context(&self) -> &AppContext {
        &self.context
    }

    // ========================================================================
    // Matching
    // ========================================================================

    /// Ranked matches for `user_id`
    pub async fn find_matches(
        &self,
        user_id: &str,
        strategy: MatchStrategy,
        limit: usize,
        filters: &MatchFilters,
    ) -> Result<Vec<Match>> {
        require_id("user_id", user_id)?;
        self.context
            .matching()
            .find_matches(user_id, strategy, limit, filters)
            .await
    }

    /// Full breakdown and narrative for one pair
    pub async fn get_match_analysis(&self, user_id: &str, target_id: &str) -> Result<DetailedAnalysis> {
        require_id("user_id", user_id)?;
        require_id("target_id", target_id)?;
        self.context.matching().analysis(user_id, target_id).await
    }

    /// Record whether `user_id` is interested in `target_id`
    pub async fn save_match_interest(
        &self,
        user_id: &str,
        target_id: &str,
        interested: bool,
    ) -> Result<()> {
        require_id("user_id", user_id)?;
        require_id("target_id", target_id)?;
        self.context
            .matching()
            .save_interest(user_id, target_id, interested)
            .await
    }

    // ========================================================================
    // Clusters
    // ========================================================================

    /// Cross-cluster recommendations for `user_id`
    pub async fn find_similar_clusters(&self, user_id: &str) -> Result<Vec<ClusterMatch>> {
        require_id("user_id", user_id)?;
        self.context.clusters().similar_clusters(user_id).await
    }

    /// Recluster the population through the job orchestrator and wait for
    /// the new generation.
    ///
    /// Concurrent calls share one run. A non-retryable failure such as
    /// [`Error::InsufficientData`] is returned as is.
    pub async fn recompute_clusters(&self) -> Result<ClusterAnalysis> {
        let handle = self.submit(JobPayload::ClusterRecomputation)?;
        match handle.wait().await.map_err(Error::into_job_cause)? {
            JobOutput::Clusters { generation } => Ok(generation),
            other => Err(Error::internal(format!(
                "cluster job {} produced unexpected output: {other:?}",
                handle.id()
            ))),
        }
    }

    // ========================================================================
    // Background jobs
    // ========================================================================

    /// Regenerate `user_id`'s embedding in the background
    pub fn enqueue_embedding_refresh(&self, user_id: &str, force_refresh: bool) -> Result<JobHandle> {
        require_id("user_id", user_id)?;
        self.submit(JobPayload::EmbeddingRefresh {
            user_id: user_id.to_string(),
            force_refresh,
        })
    }

    /// Recompute and re-cache `user_id`'s match list in the background
    pub fn enqueue_match_recalculation(
        &self,
        user_id: &str,
        strategy: MatchStrategy,
        limit: usize,
    ) -> Result<JobHandle> {
        require_id("user_id", user_id)?;
        if limit == 0 {
            return Err(Error::invalid_argument("limit must be at least 1"));
        }
        self.submit(JobPayload::MatchRecalculation {
            user_id: user_id.to_string(),
            strategy,
            limit,
        })
    }

    /// Propose `count` collaborative projects for a pair in the background
    pub fn enqueue_project_generation(
        &self,
        user_id: &str,
        partner_id: &str,
        count: usize,
    ) -> Result<JobHandle> {
        require_id("user_id", user_id)?;
        require_id("partner_id", partner_id)?;
        self.submit(JobPayload::ProjectGeneration {
            user_id: user_id.to_string(),
            partner_id: partner_id.to_string(),
            count,
        })
    }

    /// Persisted record of `job_id`
    pub async fn job(&self, job_id: &str) -> Result<Option<Job>> {
        self.context.orchestrator().job(job_id).await
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Hit, miss and entry counters of the match cache
    pub async fn cache_stats(&self) -> Result<CacheStats> {
        self.context.cache().stats().await
    }

    /// Stop accepting jobs and wait for the in-flight ones
    pub async fn shutdown(&self) {
        self.context.shutdown().await;
    }

    fn submit(&self, payload: JobPayload) -> Result<JobHandle> {
        let handle = self.context.orchestrator().submit(payload)?;
        debug!(job_id = %handle.id(), kind = %handle.kind(), "job handle issued");
        Ok(handle)
    }
}

fn require_id(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::invalid_argument(format!("{field} must not be empty")));
    }
    Ok(())
}
