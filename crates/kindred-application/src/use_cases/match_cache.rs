//! Match cache
//!
//! Typed front of a [`CacheProvider`]. Keys are deterministic composites:
//!
//! | Key | Value |
//! |-----|-------|
//! | `matches:{user}:{strategy}:{limit}:{filters}` | `Vec<Match>` |
//! | `analysis:{user}:{target}` | `DetailedAnalysis` |
//! | `clusters:{user}` | `Vec<ClusterMatch>` |
//! | `symbolic:{user}` | `SymbolicSummary` |
//!
//! `{filters}` is a SHA-256 fingerprint of the canonical filter JSON, so
//! equivalent filter sets share an entry. Values are stored as JSON with
//! full float precision; a hit deserialises to exactly the value written.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use kindred_domain::entities::{JobPayload, MatchFilters, MatchStrategy};
use kindred_domain::error::Result;
use kindred_domain::ports::{CacheEntryConfig, CacheProvider, CacheStats};

/// TTL per cached value family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchCacheTtls {
    /// Match lists
    pub matches: Duration,
    /// Detailed analyses
    pub analysis: Duration,
    /// Cross-cluster recommendations
    pub clusters: Duration,
    /// Symbolic summaries
    pub symbolic: Duration,
}

impl Default for MatchCacheTtls {
    fn default() -> Self {
        Self {
            matches: Duration::from_secs(3600),
            analysis: Duration::from_secs(3600),
            clusters: Duration::from_secs(3600),
            symbolic: Duration::from_secs(86_400),
        }
    }
}

/// Cache key builders
pub mod keys {
    use super::{Digest, MatchFilters, MatchStrategy, Sha256};

    /// Fingerprint of a filter set, stable across equivalent orderings
    pub fn filters_fingerprint(filters: &MatchFilters) -> String {
        let canonical = serde_json::to_vec(&filters.normalized()).unwrap_or_default();
        let digest = Sha256::digest(&canonical);
        hex::encode(&digest[..8])
    }

    /// Match list key
    pub fn matches(user_id: &str, strategy: MatchStrategy, limit: usize, filters: &MatchFilters) -> String {
        format!(
            "{}{strategy}:{limit}:{}",
            matches_prefix(user_id),
            filters_fingerprint(filters)
        )
    }

    /// Prefix of every match list of `user_id`
    pub fn matches_prefix(user_id: &str) -> String {
        format!("matches:{user_id}:")
    }

    /// Analysis key
    pub fn analysis(user_id: &str, target_id: &str) -> String {
        format!("{}{target_id}", analysis_prefix(user_id))
    }

    /// Prefix of every analysis requested by `user_id`
    pub fn analysis_prefix(user_id: &str) -> String {
        format!("analysis:{user_id}:")
    }

    /// Cross-cluster recommendations key
    pub fn clusters(user_id: &str) -> String {
        format!("{CLUSTERS_PREFIX}{user_id}")
    }

    /// Prefix of every cluster lookup
    pub const CLUSTERS_PREFIX: &str = "clusters:";

    /// Symbolic summary key
    pub fn symbolic(user_id: &str) -> String {
        format!("symbolic:{user_id}")
    }
}

/// Typed TTL cache for computed results
#[derive(Debug, Clone)]
pub struct MatchCache {
    provider: Arc<dyn CacheProvider>,
    ttls: MatchCacheTtls,
}

impl MatchCache {
    /// Wrap a cache backend
    pub fn new(provider: Arc<dyn CacheProvider>, ttls: MatchCacheTtls) -> Self {
        Self { provider, ttls }
    }

    /// TTLs in use
    pub fn ttls(&self) -> &MatchCacheTtls {
        &self.ttls
    }

    /// Name of the backend
    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    /// Cached value under `key`.
    ///
    /// An entry that no longer deserialises into `T` is dropped and reported
    /// as a miss, so a schema change never serves a malformed value.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(json) = self.provider.get_json(key).await? else {
            debug!(key, "cache miss");
            return Ok(None);
        };
        match serde_json::from_str(&json) {
            Ok(value) => {
                debug!(key, "cache hit");
                Ok(Some(value))
            }
            Err(e) => {
                warn!(key, error = %e, "discarding undecodable cache entry");
                self.provider.delete(key).await?;
                Ok(None)
            }
        }
    }

    /// Store `value` under `key` for `ttl`
    pub async fn set<T: Serialize + Sync>(&self, key: &str, value: &T, ttl: Duration) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.provider
            .set_json(key, &json, CacheEntryConfig::new().with_ttl(ttl))
            .await
    }

    /// Remove every key under `prefix`
    pub async fn invalidate(&self, prefix: &str) -> Result<usize> {
        let removed = self.provider.invalidate_prefix(prefix).await?;
        debug!(prefix, removed, "cache prefix invalidated");
        Ok(removed)
    }

    /// Backend statistics
    pub async fn stats(&self) -> Result<CacheStats> {
        self.provider.stats().await
    }

    /// Prefixes made stale by a successful job
    pub fn invalidation_prefixes(payload: &JobPayload) -> Vec<String> {
        match payload {
            JobPayload::EmbeddingRefresh { user_id, .. } => vec![
                keys::matches_prefix(user_id),
                keys::analysis_prefix(user_id),
                keys::CLUSTERS_PREFIX.to_string(),
            ],
            JobPayload::MatchRecalculation { user_id, .. } => {
                vec![keys::analysis_prefix(user_id)]
            }
            JobPayload::ClusterRecomputation => vec![keys::CLUSTERS_PREFIX.to_string()],
            JobPayload::ProjectGeneration { .. } => Vec::new(),
        }
    }
}
