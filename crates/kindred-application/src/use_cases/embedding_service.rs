//! Embedding Service Use Case
//!
//! Turns a user's profile document into an embedding and stores it as the
//! user's current generation. A stored embedding is superseded, never
//! edited, so running the same refresh twice is harmless.

use std::sync::Arc;

use sha2::{Digest, Sha256};
use tracing::{debug, info};

use kindred_domain::entities::UserEmbedding;
use kindred_domain::error::{Error, Result};
use kindred_domain::ports::EmbeddingProvider;
use kindred_domain::repositories::{EmbeddingRepository, ProfileRepository};

use crate::ports::services::{EmbeddingRefreshOutcome, EmbeddingServiceInterface};
use crate::timeouts::{IoTimeouts, bounded};

/// Metadata key holding the provider name
pub const METADATA_PROVIDER: &str = "provider";
/// Metadata key holding the fingerprint of the embedded text
pub const METADATA_SOURCE_HASH: &str = "source_sha256";

/// Embedding service implementation
pub struct EmbeddingServiceImpl {
    embeddings: Arc<dyn EmbeddingRepository>,
    profiles: Arc<dyn ProfileRepository>,
    provider: Arc<dyn EmbeddingProvider>,
    timeouts: IoTimeouts,
}

impl EmbeddingServiceImpl {
    /// Create the service with injected collaborators
    pub fn new(
        embeddings: Arc<dyn EmbeddingRepository>,
        profiles: Arc<dyn ProfileRepository>,
        provider: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        Self {
            embeddings,
            profiles,
            provider,
            timeouts: IoTimeouts::default(),
        }
    }

    /// Use custom I/O deadlines
    #[must_use]
    pub fn with_timeouts(mut self, timeouts: IoTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }
}

#[async_trait::async_trait]
impl EmbeddingServiceInterface for EmbeddingServiceImpl {
    async fn refresh(&self, user_id: &str, force_refresh: bool) -> Result<EmbeddingRefreshOutcome> {
        if !force_refresh {
            let existing = bounded(
                "embedding lookup",
                self.timeouts.persistence,
                self.embeddings.get(user_id),
            )
            .await?;
            if let Some(existing) = existing {
                debug!(user_id, "keeping existing embedding");
                return Ok(EmbeddingRefreshOutcome {
                    user_id: user_id.to_string(),
                    dimensions: existing.dimensions(),
                    reused: true,
                });
            }
        }

        let document = bounded(
            "profile document lookup",
            self.timeouts.persistence,
            self.profiles.document(user_id),
        )
        .await?
        .ok_or_else(|| Error::not_found(format!("profile document for user {user_id}")))?;
        if document.is_blank() {
            return Err(Error::invalid_argument(format!(
                "profile document of user {user_id} has nothing to embed"
            )));
        }

        let text = document.to_embedding_text();
        let generated = bounded(
            "embedding generation",
            self.timeouts.embedding,
            self.provider.embed(&text),
        )
        .await?;

        let expected = self.provider.dimensions();
        if generated.vector.len() != expected {
            return Err(Error::dimension_mismatch(expected, generated.vector.len()));
        }

        let embedding = UserEmbedding::new(user_id, generated.vector, generated.model)
            .with_metadata(METADATA_PROVIDER, self.provider.provider_name())
            .with_metadata(METADATA_SOURCE_HASH, hex::encode(Sha256::digest(text.as_bytes())));
        let dimensions = embedding.dimensions();
        bounded(
            "embedding write",
            self.timeouts.persistence,
            self.embeddings.put(embedding),
        )
        .await?;

        info!(
            user_id,
            dimensions,
            provider = self.provider.provider_name(),
            "embedding refreshed"
        );
        Ok(EmbeddingRefreshOutcome {
            user_id: user_id.to_string(),
            dimensions,
            reused: false,
        })
    }
}
