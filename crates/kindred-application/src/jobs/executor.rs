//! Job executor backed by the application services

use std::sync::Arc;

use kindred_domain::entities::{JobOutput, JobPayload};
use kindred_domain::error::Result;

use crate::ports::services::{
    ClusterServiceInterface, EmbeddingServiceInterface, JobExecutor, MatchingServiceInterface,
    ProjectServiceInterface,
};

/// Dispatches each payload to the service that computes it
pub struct ServiceJobExecutor {
    embedding: Arc<dyn EmbeddingServiceInterface>,
    matching: Arc<dyn MatchingServiceInterface>,
    clusters: Arc<dyn ClusterServiceInterface>,
    projects: Arc<dyn ProjectServiceInterface>,
}

impl ServiceJobExecutor {
    /// Create an executor over the given services
    pub fn new(
        embedding: Arc<dyn EmbeddingServiceInterface>,
        matching: Arc<dyn MatchingServiceInterface>,
        clusters: Arc<dyn ClusterServiceInterface>,
        projects: Arc<dyn ProjectServiceInterface>,
    ) -> Self {
        Self {
            embedding,
            matching,
            clusters,
            projects,
        }
    }
}

#[async_trait::async_trait]
impl JobExecutor for ServiceJobExecutor {
    async fn execute(&self, payload: &JobPayload) -> Result<JobOutput> {
        match payload {
            JobPayload::EmbeddingRefresh {
                user_id,
                force_refresh,
            } => {
                let outcome = self.embedding.refresh(user_id, *force_refresh).await?;
                Ok(JobOutput::Embedding {
                    user_id: outcome.user_id,
                    dimensions: outcome.dimensions,
                    reused: outcome.reused,
                })
            }
            JobPayload::MatchRecalculation {
                user_id,
                strategy,
                limit,
            } => Ok(JobOutput::Matches {
                matches: self.matching.recalculate(user_id, *strategy, *limit).await?,
            }),
            JobPayload::ClusterRecomputation => Ok(JobOutput::Clusters {
                generation: self.clusters.recompute().await?,
            }),
            JobPayload::ProjectGeneration {
                user_id,
                partner_id,
                count,
            } => Ok(JobOutput::Projects {
                projects: self.projects.generate(user_id, partner_id, *count).await?,
            }),
        }
    }
}
