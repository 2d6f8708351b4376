//! Deadlines for calls that cross an I/O boundary

use std::future::Future;
use std::time::Duration;

use kindred_domain::error::{Error, Result};

/// Per-collaborator call deadlines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IoTimeouts {
    /// Embedding generator calls
    pub embedding: Duration,
    /// Astrological calculator calls
    pub astrology: Duration,
    /// Narrative generator calls
    pub narrative: Duration,
    /// Persistence calls
    pub persistence: Duration,
}

impl Default for IoTimeouts {
    fn default() -> Self {
        Self {
            embedding: Duration::from_secs(10),
            astrology: Duration::from_secs(5),
            narrative: Duration::from_secs(30),
            persistence: Duration::from_secs(5),
        }
    }
}

/// Run `fut`, failing with [`Error::Timeout`] once `limit` elapses
pub async fn bounded<T, F>(operation: &str, limit: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| Error::timeout(operation, limit))?
}
