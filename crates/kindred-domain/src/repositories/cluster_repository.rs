//! Cluster Repository Interface

use async_trait::async_trait;
use std::sync::Arc;

use crate::entities::ClusterGeneration;
use crate::error::Result;

/// Repository: cluster generations
///
/// Holds exactly one current generation; `replace` swaps it wholesale.
#[async_trait]
pub trait ClusterRepository: Send + Sync {
    /// Current generation, if clustering ever ran
    async fn current(&self) -> Result<Option<Arc<ClusterGeneration>>>;

    /// Make `generation` current, discarding the previous one
    async fn replace(&self, generation: ClusterGeneration) -> Result<()>;
}
