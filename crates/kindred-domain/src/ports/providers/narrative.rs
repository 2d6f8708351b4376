use async_trait::async_trait;

use crate::entities::{Match, ProjectContext, ProjectIdea};
use crate::error::Result;

/// Narrative generator contract
///
/// Produces human-readable text from structured inputs. The engine never
/// depends on the text for scoring.
#[async_trait]
pub trait NarrativeProvider: Send + Sync {
    /// Explain why two users were matched
    async fn explain_match(&self, scored: &Match) -> Result<String>;

    /// Propose `context.count` projects for a pair.
    ///
    /// Implementations fill the descriptive fields; identity, partners,
    /// feasibility and timestamps are set by the caller.
    async fn propose_projects(&self, context: &ProjectContext) -> Result<Vec<ProjectIdea>>;

    /// Provider identifier
    fn provider_name(&self) -> &str;
}
