//! Composition Root
//!
//! Wires the engine from an [`AppConfig`] with explicit constructor
//! injection. Swappable backends (cache, embedding generator, narrative
//! generator) are resolved by name through the linkme registries; the
//! persistence layer and the astrological calculator are handed in.
//!
//! ```text
//! AppConfig ─► registries ─► cache / embedding / narrative providers
//!                                   │
//! Repositories + symbolic ──────────┼─► services ─► ServiceJobExecutor
//!                                   │                     │
//!                                   └──── MatchCache ─► JobOrchestrator
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let context = init_app(ConfigLoader::new().load()?)?;
//! let matches = context
//!     .matching()
//!     .find_matches("u1", MatchStrategy::Complementary, 10, &MatchFilters::default())
//!     .await?;
//! ```

use std::sync::Arc;

use tracing::info;

use kindred_application::domain_services::{ClusteringEngine, CompatibilityScorer, SimilarityIndex};
use kindred_application::jobs::{JobOrchestrator, ServiceJobExecutor};
use kindred_application::ports::registry::{
    resolve_cache_provider, resolve_embedding_provider, resolve_narrative_provider,
};
use kindred_application::ports::services::{
    ClusterServiceInterface, EmbeddingServiceInterface, JobExecutor, MatchingServiceInterface,
    ProjectServiceInterface,
};
use kindred_application::use_cases::{
    ClusterServiceImpl, EmbeddingServiceImpl, MatchCache, MatchingServiceImpl, ProjectServiceImpl,
};
use kindred_domain::error::{Error, Result};
use kindred_domain::ports::{
    CacheProvider, EmbeddingProvider, NarrativeProvider, SymbolicSummaryProvider,
};
use kindred_domain::repositories::{
    ClusterRepository, EmbeddingRepository, JobRepository, MatchRepository, ProfileRepository,
    ProjectRepository,
};
use kindred_providers::repository::{
    MemoryClusterRepository, MemoryEmbeddingRepository, MemoryJobRepository,
    MemoryMatchRepository, MemoryProfileRepository, MemoryProjectRepository,
};
use kindred_providers::symbolic::MemorySymbolicProvider;

use crate::config::AppConfig;
use crate::config::loader::validate_app_config;

// ============================================================================
// Persistence
// ============================================================================

/// Persistence adapters consumed by the engine
#[derive(Clone)]
pub struct Repositories {
    /// User embeddings
    pub embeddings: Arc<dyn EmbeddingRepository>,
    /// Personality snapshots and profile documents
    pub profiles: Arc<dyn ProfileRepository>,
    /// Match interests and audit records
    pub matches: Arc<dyn MatchRepository>,
    /// Cluster generations
    pub clusters: Arc<dyn ClusterRepository>,
    /// Job records
    pub jobs: Arc<dyn JobRepository>,
    /// Project ideas
    pub projects: Arc<dyn ProjectRepository>,
}

impl Repositories {
    /// Process-local stores
    pub fn in_memory() -> Self {
        Self {
            embeddings: Arc::new(MemoryEmbeddingRepository::new()),
            profiles: Arc::new(MemoryProfileRepository::new()),
            matches: Arc::new(MemoryMatchRepository::new()),
            clusters: Arc::new(MemoryClusterRepository::new()),
            jobs: Arc::new(MemoryJobRepository::new()),
            projects: Arc::new(MemoryProjectRepository::new()),
        }
    }
}

impl Default for Repositories {
    fn default() -> Self {
        Self::in_memory()
    }
}

// ============================================================================
// Application Context
// ============================================================================

/// Application context holding every wired component
pub struct AppContext {
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ========================================================================
    // Adapters
    // ========================================================================
    repositories: Repositories,
    symbolic: Arc<dyn SymbolicSummaryProvider>,
    cache_provider: Arc<dyn CacheProvider>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    narrative_provider: Arc<dyn NarrativeProvider>,

    // ========================================================================
    // Services
    // ========================================================================
    cache: MatchCache,
    matching: Arc<dyn MatchingServiceInterface>,
    clusters: Arc<dyn ClusterServiceInterface>,
    embedding: Arc<dyn EmbeddingServiceInterface>,
    projects: Arc<dyn ProjectServiceInterface>,
    orchestrator: JobOrchestrator,
}

impl AppContext {
    // ========================================================================
    // Adapters
    // ========================================================================

    /// Persistence adapters
    pub fn repositories(&self) -> &Repositories {
        &self.repositories
    }

    /// Astrological summary source
    pub fn symbolic(&self) -> Arc<dyn SymbolicSummaryProvider> {
        Arc::clone(&self.symbolic)
    }

    /// Resolved cache backend
    pub fn cache_provider(&self) -> Arc<dyn CacheProvider> {
        Arc::clone(&self.cache_provider)
    }

    /// Resolved embedding generator
    pub fn embedding_provider(&self) -> Arc<dyn EmbeddingProvider> {
        Arc::clone(&self.embedding_provider)
    }

    /// Resolved narrative generator
    pub fn narrative_provider(&self) -> Arc<dyn NarrativeProvider> {
        Arc::clone(&self.narrative_provider)
    }

    // ========================================================================
    // Services
    // ========================================================================

    /// Typed match cache
    pub fn cache(&self) -> &MatchCache {
        &self.cache
    }

    /// Matching service
    pub fn matching(&self) -> Arc<dyn MatchingServiceInterface> {
        Arc::clone(&self.matching)
    }

    /// Cluster service
    pub fn clusters(&self) -> Arc<dyn ClusterServiceInterface> {
        Arc::clone(&self.clusters)
    }

    /// Embedding refresh service
    pub fn embedding(&self) -> Arc<dyn EmbeddingServiceInterface> {
        Arc::clone(&self.embedding)
    }

    /// Project generation service
    pub fn projects(&self) -> Arc<dyn ProjectServiceInterface> {
        Arc::clone(&self.projects)
    }

    /// Background job scheduler
    pub fn orchestrator(&self) -> &JobOrchestrator {
        &self.orchestrator
    }

    /// Stop accepting jobs and drain the in-flight ones
    pub async fn shutdown(&self) {
        self.orchestrator.shutdown().await;
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("cache", &self.cache_provider.provider_name())
            .field("embedding", &self.embedding_provider.provider_name())
            .field("narrative", &self.narrative_provider.provider_name())
            .field("jobs_in_flight", &self.orchestrator.in_flight())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Initialization
// ============================================================================

/// Initialize the application with process-local persistence
///
/// Providers are auto-registered via linkme distributed slices when
/// kindred-providers is linked. No explicit registration call is needed.
pub fn init_app(config: AppConfig) -> Result<AppContext> {
    init_app_with(
        config,
        Repositories::in_memory(),
        Arc::new(MemorySymbolicProvider::new()),
    )
}

/// Initialize the application over the given persistence and astrological
/// summary source
pub fn init_app_with(
    config: AppConfig,
    repositories: Repositories,
    symbolic: Arc<dyn SymbolicSummaryProvider>,
) -> Result<AppContext> {
    info!("initializing application context");
    validate_app_config(&config)?;
    let config = Arc::new(config);
    let timeouts = config.timeouts.to_io_timeouts();

    // ========================================================================
    // Resolve providers from the registries
    // ========================================================================

    let cache_provider = resolve_cache_provider(&config.cache.registry_config())
        .map_err(|e| Error::configuration(format!("Cache: {e}")))?;
    let embedding_provider = resolve_embedding_provider(
        &config
            .providers
            .embedding
            .registry_config(timeouts.embedding),
    )
    .map_err(|e| Error::configuration(format!("Embedding: {e}")))?;
    let narrative_provider = resolve_narrative_provider(
        &config
            .providers
            .narrative
            .registry_config(timeouts.narrative),
    )
    .map_err(|e| Error::configuration(format!("Narrative: {e}")))?;

    info!(
        cache = cache_provider.provider_name(),
        embedding = embedding_provider.provider_name(),
        narrative = narrative_provider.provider_name(),
        "resolved providers"
    );

    // ========================================================================
    // Services
    // ========================================================================

    let cache = MatchCache::new(Arc::clone(&cache_provider), config.cache.ttls());
    let scorer = CompatibilityScorer::new(Arc::new(config.scoring.clone()));

    let matching: Arc<dyn MatchingServiceInterface> = Arc::new(
        MatchingServiceImpl::new(
            Arc::clone(&repositories.embeddings),
            Arc::clone(&repositories.profiles),
            Arc::clone(&repositories.matches),
            Arc::clone(&symbolic),
            Arc::clone(&narrative_provider),
            cache.clone(),
            scorer,
        )
        .with_index(SimilarityIndex::new(config.similarity))
        .with_timeouts(timeouts),
    );
    let clusters: Arc<dyn ClusterServiceInterface> = Arc::new(
        ClusterServiceImpl::new(
            Arc::clone(&repositories.embeddings),
            Arc::clone(&repositories.profiles),
            Arc::clone(&repositories.clusters),
            cache.clone(),
            ClusteringEngine::new(config.clustering),
        )
        .with_timeouts(timeouts),
    );
    let embedding: Arc<dyn EmbeddingServiceInterface> = Arc::new(
        EmbeddingServiceImpl::new(
            Arc::clone(&repositories.embeddings),
            Arc::clone(&repositories.profiles),
            Arc::clone(&embedding_provider),
        )
        .with_timeouts(timeouts),
    );
    let projects: Arc<dyn ProjectServiceInterface> = Arc::new(
        ProjectServiceImpl::new(
            Arc::clone(&matching),
            Arc::clone(&narrative_provider),
            Arc::clone(&repositories.projects),
        )
        .with_timeouts(timeouts),
    );

    // ========================================================================
    // Job orchestration
    // ========================================================================

    let executor: Arc<dyn JobExecutor> = Arc::new(ServiceJobExecutor::new(
        Arc::clone(&embedding),
        Arc::clone(&matching),
        Arc::clone(&clusters),
        Arc::clone(&projects),
    ));
    let orchestrator = JobOrchestrator::new(
        executor,
        Arc::clone(&repositories.jobs),
        cache.clone(),
        config.jobs,
        timeouts,
    );

    info!("application context ready");

    Ok(AppContext {
        config,
        repositories,
        symbolic,
        cache_provider,
        embedding_provider,
        narrative_provider,
        cache,
        matching,
        clusters,
        embedding,
        projects,
        orchestrator,
    })
}
