//! Cluster Service Use Case
//!
//! Reclusters the embedding population into a new generation and answers
//! cross-cluster recommendations from the current one. Generations are
//! replaced wholesale; readers hold an `Arc` to one complete generation.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use futures::{StreamExt, TryStreamExt, stream};
use tracing::{info, warn};

use kindred_domain::entities::{ClusterGeneration, ClusterMatch};
use kindred_domain::error::{Error, Result};
use kindred_domain::repositories::{ClusterRepository, EmbeddingRepository, ProfileRepository};

use super::compute;
use super::match_cache::{MatchCache, keys};
use super::matching_service::DEFAULT_LOAD_FAN_OUT;
use crate::domain_services::ClusteringEngine;
use crate::ports::services::ClusterServiceInterface;
use crate::timeouts::{IoTimeouts, bounded};

/// Cluster service implementation
pub struct ClusterServiceImpl {
    embeddings: Arc<dyn EmbeddingRepository>,
    profiles: Arc<dyn ProfileRepository>,
    clusters: Arc<dyn ClusterRepository>,
    cache: MatchCache,
    engine: ClusteringEngine,
    timeouts: IoTimeouts,
}

impl ClusterServiceImpl {
    /// Create the service with injected collaborators
    pub fn new(
        embeddings: Arc<dyn EmbeddingRepository>,
        profiles: Arc<dyn ProfileRepository>,
        clusters: Arc<dyn ClusterRepository>,
        cache: MatchCache,
        engine: ClusteringEngine,
    ) -> Self {
        Self {
            embeddings,
            profiles,
            clusters,
            cache,
            engine,
            timeouts: IoTimeouts::default(),
        }
    }

    /// Use custom I/O deadlines
    #[must_use]
    pub fn with_timeouts(mut self, timeouts: IoTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    async fn traits_of(&self, user_ids: Vec<String>) -> Result<HashMap<String, BTreeSet<String>>> {
        stream::iter(user_ids)
            .map(|user_id| async move {
                let profile = bounded(
                    "personality lookup",
                    self.timeouts.persistence,
                    self.profiles.personality(&user_id),
                )
                .await?;
                Ok::<_, Error>(profile.map(|p| (user_id, p.traits)))
            })
            .buffered(DEFAULT_LOAD_FAN_OUT)
            .try_filter_map(|entry| async move { Ok(entry) })
            .try_collect()
            .await
    }
}

#[async_trait::async_trait]
impl ClusterServiceInterface for ClusterServiceImpl {
    async fn recompute(&self) -> Result<ClusterGeneration> {
        let population = bounded(
            "embedding scan",
            self.timeouts.persistence,
            self.embeddings.list_all(),
        )
        .await?;
        let traits = self
            .traits_of(population.iter().map(|e| e.user_id.clone()).collect())
            .await?;

        let engine = self.engine.clone();
        let generation =
            compute("clustering", move || engine.cluster(&population, &traits)).await?;

        bounded(
            "cluster generation write",
            self.timeouts.persistence,
            self.clusters.replace(generation.clone()),
        )
        .await?;

        info!(
            generation_id = %generation.generation_id,
            k = generation.k,
            population = generation.population,
            converged = generation.converged,
            "cluster generation replaced"
        );
        Ok(generation)
    }

    async fn similar_clusters(&self, user_id: &str) -> Result<Vec<ClusterMatch>> {
        let key = keys::clusters(user_id);
        match self.cache.get::<Vec<ClusterMatch>>(&key).await {
            Ok(Some(cached)) => return Ok(cached),
            Ok(None) => {}
            Err(e) => warn!(user_id, error = %e, "cluster cache read failed"),
        }

        let generation = bounded(
            "cluster generation read",
            self.timeouts.persistence,
            self.clusters.current(),
        )
        .await?
        .ok_or_else(|| Error::not_found("cluster generation"))?;
        let matches = self.engine.similar_clusters(&generation, user_id)?;

        if let Err(e) = self
            .cache
            .set(&key, &matches, self.cache.ttls().clusters)
            .await
        {
            warn!(user_id, error = %e, "cluster cache write failed");
        }
        Ok(matches)
    }
}
