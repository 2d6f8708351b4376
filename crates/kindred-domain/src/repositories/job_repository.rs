//! Job Repository Interface

use async_trait::async_trait;

use crate::entities::Job;
use crate::error::Result;

/// Repository: job records keyed by job id
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Insert or overwrite the record of `job.id`
    async fn save(&self, job: &Job) -> Result<()>;

    /// Record of `job_id`
    async fn get(&self, job_id: &str) -> Result<Option<Job>>;
}
