//! Null embedding provider for testing and development
//!
//! Deterministic, hash-based embeddings. No network, always works offline;
//! the same text always maps to the same unit vector.

use std::sync::Arc;

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use kindred_application::ports::registry::{
    EMBEDDING_PROVIDERS, EmbeddingProviderConfig, EmbeddingProviderEntry,
};
use kindred_domain::error::Result;
use kindred_domain::ports::EmbeddingProvider;
use kindred_domain::value_objects::Embedding;

use crate::constants::EMBEDDING_DIMENSION_NULL;

/// Model label attached to null embeddings
pub const NULL_MODEL: &str = "null-hash";

/// Null embedding provider for testing
///
/// # Example
///
/// ```rust
/// use kindred_providers::embedding::NullEmbeddingProvider;
/// use kindred_domain::ports::EmbeddingProvider;
///
/// let provider = NullEmbeddingProvider::new();
/// assert_eq!(provider.dimensions(), 384);
/// assert_eq!(provider.provider_name(), "null");
/// ```
#[derive(Debug, Clone)]
pub struct NullEmbeddingProvider {
    dimensions: usize,
}

impl NullEmbeddingProvider {
    /// Create a provider with the default dimension
    pub fn new() -> Self {
        Self::with_dimensions(EMBEDDING_DIMENSION_NULL)
    }

    /// Create a provider returning `dimensions`-long vectors
    pub fn with_dimensions(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    /// Deterministic unit vector for `text`
    pub fn vector_for(&self, text: &str) -> Vec<f32> {
        let mut vector = Vec::with_capacity(self.dimensions);
        let mut block = 0u32;
        while vector.len() < self.dimensions {
            let digest = Sha256::new()
                .chain_update(text.as_bytes())
                .chain_update(block.to_le_bytes())
                .finalize();
            vector.extend(
                digest
                    .iter()
                    .take(self.dimensions - vector.len())
                    .map(|byte| f32::from(*byte) / 127.5 - 1.0),
            );
            block += 1;
        }
        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|x| *x /= norm);
        }
        vector
    }
}

impl Default for NullEmbeddingProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for NullEmbeddingProvider {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        Ok(texts
            .iter()
            .map(|text| Embedding {
                vector: self.vector_for(text),
                model: NULL_MODEL.to_string(),
                dimensions: self.dimensions,
            })
            .collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn provider_name(&self) -> &str {
        "null"
    }
}

// ============================================================================
// Auto-registration via linkme
// ============================================================================

#[linkme::distributed_slice(EMBEDDING_PROVIDERS)]
static NULL_PROVIDER: EmbeddingProviderEntry = EmbeddingProviderEntry {
    name: "null",
    description: "Deterministic hash-based embeddings for tests and offline use",
    factory: |config: &EmbeddingProviderConfig| {
        let provider = config.dimensions.map_or_else(
            NullEmbeddingProvider::new,
            NullEmbeddingProvider::with_dimensions,
        );
        Ok(Arc::new(provider))
    },
};
