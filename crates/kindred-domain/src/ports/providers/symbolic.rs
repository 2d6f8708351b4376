use async_trait::async_trait;

use crate::entities::SymbolicSummary;
use crate::error::Result;

/// Astrological calculator contract
///
/// The engine consumes only the symbolic snapshot; ephemeris arithmetic is
/// the collaborator's business.
#[async_trait]
pub trait SymbolicSummaryProvider: Send + Sync {
    /// Summary for `user_id`; `Ok(None)` when the user has no birth data
    async fn summary(&self, user_id: &str) -> Result<Option<SymbolicSummary>>;

    /// Provider identifier
    fn provider_name(&self) -> &str;
}
