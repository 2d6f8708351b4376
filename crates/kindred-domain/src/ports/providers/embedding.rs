use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::value_objects::Embedding;

/// Embedding generator contract
///
/// Turns a user's profile text into a fixed-length vector. Latency and
/// availability are the provider's concern; callers bound every call with a
/// timeout.
///
/// # Default Implementations
///
/// `embed()` delegates to `embed_batch()` with a single item, so providers
/// only need to implement the batch form.
///
/// # Example
///
/// ```ignore
/// let embedding = provider.embed("Traits: analytical, structured").await?;
/// assert_eq!(embedding.vector.len(), provider.dimensions());
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text
    async fn embed(&self, text: &str) -> Result<Embedding> {
        let embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings.into_iter().next().ok_or_else(|| {
            Error::external_service(self.provider_name(), "no embedding returned")
        })
    }

    /// Embed several texts, preserving order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>>;

    /// Length of every vector this provider returns
    fn dimensions(&self) -> usize;

    /// Provider identifier (e.g. "openai", "null")
    fn provider_name(&self) -> &str;
}
