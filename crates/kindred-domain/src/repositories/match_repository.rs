//! Match Repository Interface

use async_trait::async_trait;

use crate::entities::{MatchInterest, MatchRecord};
use crate::error::Result;

/// Repository: match interests and audit records
///
/// Match records are an audit trail; they are never read back as a
/// source of truth for scoring.
#[async_trait]
pub trait MatchRepository: Send + Sync {
    /// Upsert the interest keyed by `(user_id, target_id)`
    async fn save_interest(&self, interest: MatchInterest) -> Result<()>;

    /// Interest of `user_id` in `target_id`
    async fn interest(&self, user_id: &str, target_id: &str) -> Result<Option<MatchInterest>>;

    /// Append a match audit record
    async fn save_record(&self, record: MatchRecord) -> Result<()>;

    /// Records of `user_id`, oldest first
    async fn records_for(&self, user_id: &str) -> Result<Vec<MatchRecord>>;
}
