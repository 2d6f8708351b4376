//! Redis distributed cache provider
//!
//! Shares the match cache between engine instances. The connection is a
//! [`ConnectionManager`] opened on first use, which reconnects on its own
//! after a dropped connection.
//!
//! Keys are stored under an optional namespace (`{namespace}:{key}`), so
//! several deployments can share a database and `clear` only touches the
//! current one. Prefix invalidation, and `size` under a namespace, walk the
//! keyspace with `SCAN`, never `KEYS`.
//!
//! ## Example
//!
//! ```ignore
//! use kindred_providers::cache::RedisCacheProvider;
//!
//! let provider = RedisCacheProvider::new("redis://localhost:6379")?.with_namespace("kindred");
//! ```

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use tokio::sync::OnceCell;

use kindred_application::ports::registry::{
    CACHE_PROVIDERS, CacheProviderConfig, CacheProviderEntry,
};
use kindred_domain::error::{Error, Result};
use kindred_domain::ports::{CacheEntryConfig, CacheProvider, CacheStats};

use crate::constants::{CACHE_NAMESPACE_SEPARATOR, REDIS_DEFAULT_URL, REDIS_SCAN_COUNT};

fn redis_error(operation: &str, error: &redis::RedisError) -> Error {
    Error::cache(format!("Redis {operation} failed: {error}"))
}

/// Escape glob metacharacters so a literal prefix can be used with `MATCH`
pub fn escape_glob(literal: &str) -> String {
    let mut escaped = String::with_capacity(literal.len());
    for c in literal.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// `MATCH` pattern selecting every key that starts with `stored_prefix`
pub fn prefix_pattern(stored_prefix: &str) -> String {
    format!("{}*", escape_glob(stored_prefix))
}

/// Redis cache provider
#[derive(Clone)]
pub struct RedisCacheProvider {
    client: Client,
    connection: Arc<OnceCell<ConnectionManager>>,
    namespace: Option<String>,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl RedisCacheProvider {
    /// Create a provider for `connection_string` (e.g. `redis://localhost:6379`)
    ///
    /// No connection is made until the first operation.
    pub fn new(connection_string: &str) -> Result<Self> {
        let client = Client::open(connection_string).map_err(|e| {
            Error::configuration_with_source(format!("invalid Redis URL {connection_string}"), e)
        })?;

        Ok(Self {
            client,
            connection: Arc::new(OnceCell::new()),
            namespace: None,
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Store keys under `namespace`
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        self.namespace = (!namespace.is_empty()).then_some(namespace);
        self
    }

    /// Stored form of `key`
    pub fn namespaced(&self, key: &str) -> String {
        match &self.namespace {
            Some(ns) => format!("{ns}{CACHE_NAMESPACE_SEPARATOR}{key}"),
            None => key.to_string(),
        }
    }

    async fn connection(&self) -> Result<ConnectionManager> {
        self.connection
            .get_or_try_init(|| async {
                ConnectionManager::new(self.client.clone())
                    .await
                    .map_err(|e| redis_error("connect", &e))
            })
            .await
            .cloned()
    }

    /// Delete every key matching the literal prefix; returns the count
    async fn delete_matching(&self, stored_prefix: &str) -> Result<usize> {
        let mut conn = self.connection().await?;
        let pattern = prefix_pattern(stored_prefix);
        let mut cursor: u64 = 0;
        let mut removed = 0;
        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(REDIS_SCAN_COUNT)
                .query_async(&mut conn)
                .await
                .map_err(|e| redis_error("SCAN", &e))?;
            if !keys.is_empty() {
                let deleted: usize = conn
                    .del(&keys)
                    .await
                    .map_err(|e| redis_error("DEL", &e))?;
                removed += deleted;
            }
            if next == 0 {
                return Ok(removed);
            }
            cursor = next;
        }
    }

    /// Count keys matching the literal prefix
    async fn count_matching(&self, stored_prefix: &str) -> Result<usize> {
        let mut conn = self.connection().await?;
        let pattern = prefix_pattern(stored_prefix);
        let mut cursor: u64 = 0;
        // SCAN may return a key more than once
        let mut seen = HashSet::new();
        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(REDIS_SCAN_COUNT)
                .query_async(&mut conn)
                .await
                .map_err(|e| redis_error("SCAN", &e))?;
            seen.extend(keys);
            if next == 0 {
                return Ok(seen.len());
            }
            cursor = next;
        }
    }
}

#[async_trait]
impl CacheProvider for RedisCacheProvider {
    async fn get_json(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection().await?;
        let value: Option<String> = conn
            .get(self.namespaced(key))
            .await
            .map_err(|e| redis_error("GET", &e))?;
        let counter = if value.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        Ok(value)
    }

    async fn set_json(&self, key: &str, value: &str, config: CacheEntryConfig) -> Result<()> {
        let mut conn = self.connection().await?;
        let ttl_ms = u64::try_from(config.effective_ttl().as_millis())
            .unwrap_or(u64::MAX)
            .max(1);
        conn.pset_ex::<_, _, ()>(self.namespaced(key), value, ttl_ms)
            .await
            .map_err(|e| redis_error("SET", &e))
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.connection().await?;
        let deleted: usize = conn
            .del(self.namespaced(key))
            .await
            .map_err(|e| redis_error("DEL", &e))?;
        Ok(deleted > 0)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.connection().await?;
        conn.exists(self.namespaced(key))
            .await
            .map_err(|e| redis_error("EXISTS", &e))
    }

    async fn invalidate_prefix(&self, prefix: &str) -> Result<usize> {
        self.delete_matching(&self.namespaced(prefix)).await
    }

    async fn clear(&self) -> Result<()> {
        if self.namespace.is_some() {
            self.delete_matching(&self.namespaced("")).await?;
            return Ok(());
        }
        let mut conn = self.connection().await?;
        redis::cmd("FLUSHDB")
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| redis_error("FLUSHDB", &e))
    }

    async fn stats(&self) -> Result<CacheStats> {
        let mut stats = CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.size().await? as u64,
            hit_rate: 0.0,
        };
        stats.hit_rate = stats.calculate_hit_rate();
        Ok(stats)
    }

    async fn size(&self) -> Result<usize> {
        if self.namespace.is_some() {
            return self.count_matching(&self.namespaced("")).await;
        }
        let mut conn = self.connection().await?;
        redis::cmd("DBSIZE")
            .query_async(&mut conn)
            .await
            .map_err(|e| redis_error("DBSIZE", &e))
    }

    fn provider_name(&self) -> &str {
        "redis"
    }
}

impl std::fmt::Debug for RedisCacheProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCacheProvider")
            .field("namespace", &self.namespace)
            .field("connected", &self.connection.initialized())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Auto-registration via linkme distributed slice
// ============================================================================

/// Factory function for creating Redis cache provider instances.
fn redis_cache_factory(
    config: &CacheProviderConfig,
) -> std::result::Result<Arc<dyn CacheProvider>, String> {
    let uri = config.uri.as_deref().unwrap_or(REDIS_DEFAULT_URL);
    let mut provider =
        RedisCacheProvider::new(uri).map_err(|e| format!("Failed to create Redis provider: {e}"))?;
    if let Some(namespace) = &config.namespace {
        provider = provider.with_namespace(namespace.clone());
    }
    Ok(Arc::new(provider))
}

#[linkme::distributed_slice(CACHE_PROVIDERS)]
static REDIS_PROVIDER: CacheProviderEntry = CacheProviderEntry {
    name: "redis",
    description: "Redis distributed cache",
    factory: redis_cache_factory,
};
