//! Project Repository Interface

use async_trait::async_trait;

use crate::entities::ProjectIdea;
use crate::error::Result;

/// Repository: generated project ideas
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Append generated ideas
    async fn save_all(&self, projects: &[ProjectIdea]) -> Result<()>;

    /// Ideas generated for the pair, oldest first
    async fn for_pair(&self, user_id: &str, partner_id: &str) -> Result<Vec<ProjectIdea>>;
}
