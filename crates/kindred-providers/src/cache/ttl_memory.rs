//! TTL map cache provider
//!
//! Sharded concurrent map with a deadline per entry. Reads are lock-free
//! across shards and check the deadline on access; a write replaces the
//! whole entry under its shard lock, so readers never see a torn value.
//!
//! Deadlines use [`tokio::time::Instant`], which follows the runtime clock
//! and can therefore be advanced in tests with a paused runtime.
//!
//! ## Example
//!
//! ```ignore
//! use kindred_providers::cache::TtlMemoryCacheProvider;
//!
//! let provider = TtlMemoryCacheProvider::with_capacity(1_000);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::time::Instant;
use tracing::debug;

use kindred_application::ports::registry::{
    CACHE_PROVIDERS, CacheProviderConfig, CacheProviderEntry,
};
use kindred_domain::error::Result;
use kindred_domain::ports::{CacheEntryConfig, CacheProvider, CacheStats};

use crate::constants::CACHE_DEFAULT_MAX_ENTRIES;

#[derive(Debug, Clone)]
struct TtlEntry {
    json: Arc<str>,
    expires_at: Instant,
}

impl TtlEntry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// In-process cache with per-entry TTL and hit/miss accounting
#[derive(Debug)]
pub struct TtlMemoryCacheProvider {
    entries: DashMap<String, TtlEntry>,
    max_entries: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Default for TtlMemoryCacheProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TtlMemoryCacheProvider {
    /// Create a cache with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(CACHE_DEFAULT_MAX_ENTRIES)
    }

    /// Create a cache holding at most `max_entries` live entries
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            max_entries: max_entries.max(1),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Maximum number of entries
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Drop every expired entry; returns how many were dropped
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_live(now));
        before.saturating_sub(self.entries.len())
    }

    /// Make room for one more entry
    fn make_room(&self, incoming: &str) {
        if self.entries.len() < self.max_entries || self.entries.contains_key(incoming) {
            return;
        }
        if self.purge_expired() > 0 {
            return;
        }
        // evict the entry closest to expiry
        let victim = self
            .entries
            .iter()
            .min_by_key(|entry| entry.value().expires_at)
            .map(|entry| entry.key().clone());
        if let Some(key) = victim {
            debug!(key = %key, "evicting cache entry at capacity");
            self.entries.remove(&key);
        }
    }

    fn record(&self, hit: bool) {
        let counter = if hit { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

#[async_trait]
impl CacheProvider for TtlMemoryCacheProvider {
    async fn get_json(&self, key: &str) -> Result<Option<String>> {
        let now = Instant::now();
        let found = self
            .entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.json.to_string());
        if found.is_none() {
            self.entries.remove_if(key, |_, entry| !entry.is_live(now));
        }
        self.record(found.is_some());
        Ok(found)
    }

    async fn set_json(&self, key: &str, value: &str, config: CacheEntryConfig) -> Result<()> {
        self.make_room(key);
        self.entries.insert(
            key.to_string(),
            TtlEntry {
                json: Arc::from(value),
                expires_at: Instant::now() + config.effective_ttl(),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let now = Instant::now();
        Ok(self
            .entries
            .remove(key)
            .is_some_and(|(_, entry)| entry.is_live(now)))
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let now = Instant::now();
        Ok(self
            .entries
            .get(key)
            .is_some_and(|entry| entry.is_live(now)))
    }

    async fn invalidate_prefix(&self, prefix: &str) -> Result<usize> {
        let now = Instant::now();
        let mut removed = 0;
        self.entries.retain(|key, entry| {
            if key.starts_with(prefix) {
                if entry.is_live(now) {
                    removed += 1;
                }
                false
            } else {
                true
            }
        });
        Ok(removed)
    }

    async fn clear(&self) -> Result<()> {
        self.entries.clear();
        Ok(())
    }

    async fn stats(&self) -> Result<CacheStats> {
        self.purge_expired();
        let mut stats = CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.len() as u64,
            hit_rate: 0.0,
        };
        stats.hit_rate = stats.calculate_hit_rate();
        Ok(stats)
    }

    async fn size(&self) -> Result<usize> {
        self.purge_expired();
        Ok(self.entries.len())
    }

    fn provider_name(&self) -> &str {
        "ttl_memory"
    }
}

// ============================================================================
// Auto-registration via linkme
// ============================================================================

#[linkme::distributed_slice(CACHE_PROVIDERS)]
static TTL_MEMORY_PROVIDER: CacheProviderEntry = CacheProviderEntry {
    name: "ttl_memory",
    description: "In-process TTL map with hit/miss statistics",
    factory: |config: &CacheProviderConfig| {
        let provider = config
            .max_size
            .map_or_else(TtlMemoryCacheProvider::new, TtlMemoryCacheProvider::with_capacity);
        Ok(Arc::new(provider))
    },
};
