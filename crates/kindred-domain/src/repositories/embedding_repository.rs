//! Embedding Repository Interface

use async_trait::async_trait;

use crate::entities::UserEmbedding;
use crate::error::Result;

/// Repository: user embeddings
///
/// # Example
///
/// ```ignore
/// repo.put(UserEmbedding::new("u1", vector, "text-embedding-3-small")).await?;
/// let current = repo.get("u1").await?;
/// let population = repo.list_all().await?;
/// ```
#[async_trait]
pub trait EmbeddingRepository: Send + Sync {
    /// Current embedding of `user_id`
    async fn get(&self, user_id: &str) -> Result<Option<UserEmbedding>>;

    /// Store `embedding`, superseding any previous one for the same user
    async fn put(&self, embedding: UserEmbedding) -> Result<()>;

    /// Snapshot of every stored embedding, ordered by user id
    async fn list_all(&self) -> Result<Vec<UserEmbedding>>;

    /// Number of stored embeddings
    async fn count(&self) -> Result<usize>;
}
