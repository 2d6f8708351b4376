//! In-memory symbolic summary provider
//!
//! Holds summaries pushed by whatever computes charts upstream. Useful for
//! development, tests and deployments that precompute summaries.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use kindred_domain::entities::SymbolicSummary;
use kindred_domain::error::Result;
use kindred_domain::ports::SymbolicSummaryProvider;

/// In-memory symbolic summary provider
#[derive(Debug, Clone, Default)]
pub struct MemorySymbolicProvider {
    summaries: Arc<DashMap<String, SymbolicSummary>>,
}

impl MemorySymbolicProvider {
    /// Create an empty provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Store or replace the summary of `summary.user_id`
    pub fn put(&self, summary: SymbolicSummary) {
        self.summaries.insert(summary.user_id.clone(), summary);
    }

    /// Drop the summary of `user_id`
    pub fn remove(&self, user_id: &str) -> bool {
        self.summaries.remove(user_id).is_some()
    }

    /// Number of stored summaries
    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    /// Whether no summary is stored
    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }
}

#[async_trait]
impl SymbolicSummaryProvider for MemorySymbolicProvider {
    async fn summary(&self, user_id: &str) -> Result<Option<SymbolicSummary>> {
        Ok(self.summaries.get(user_id).map(|entry| entry.value().clone()))
    }

    fn provider_name(&self) -> &str {
        "memory"
    }
}
