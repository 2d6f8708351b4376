//! Use Cases
//!
//! Application services behind every engine operation, plus the typed
//! match cache they share.

/// Cross-cluster recommendations and reclustering
pub mod cluster_service;
/// Embedding refresh
pub mod embedding_service;
/// Typed TTL cache for computed results
pub mod match_cache;
/// Match lists, pair analysis and interests
pub mod matching_service;
/// Collaborative project generation
pub mod project_service;

pub use cluster_service::ClusterServiceImpl;
pub use embedding_service::EmbeddingServiceImpl;
pub use match_cache::{MatchCache, MatchCacheTtls, keys};
pub use matching_service::MatchingServiceImpl;
pub use project_service::ProjectServiceImpl;

use kindred_domain::error::{Error, Result};

/// Run a pure computation on the blocking pool
pub(crate) async fn compute<T, F>(operation: &'static str, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::internal(format!("{operation} task failed: {e}")))?
}
