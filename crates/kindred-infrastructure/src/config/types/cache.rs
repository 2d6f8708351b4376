//! Cache configuration types

use std::time::Duration;

use serde::{Deserialize, Serialize};

use kindred_application::ports::registry::CacheProviderConfig;
use kindred_application::use_cases::MatchCacheTtls;

use crate::constants::{
    CACHE_TTL_ANALYSIS_SECS, CACHE_TTL_CLUSTERS_SECS, CACHE_TTL_MATCHES_SECS,
    CACHE_TTL_SYMBOLIC_SECS, DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CACHE_NAMESPACE,
    DEFAULT_CACHE_PROVIDER,
};

/// Match cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Backend name (`ttl_memory`, `moka`, `redis`, `null`)
    pub provider: String,
    /// Entry bound of local backends
    pub max_entries: usize,
    /// Connection URL, required by `redis`
    pub redis_url: Option<String>,
    /// Key prefix isolating this deployment
    pub namespace: String,
    /// Match list TTL
    pub ttl_matches_secs: u64,
    /// Detailed analysis TTL
    pub ttl_analysis_secs: u64,
    /// Cross-cluster recommendation TTL
    pub ttl_clusters_secs: u64,
    /// Symbolic summary TTL
    pub ttl_symbolic_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_CACHE_PROVIDER.to_string(),
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            redis_url: None,
            namespace: DEFAULT_CACHE_NAMESPACE.to_string(),
            ttl_matches_secs: CACHE_TTL_MATCHES_SECS,
            ttl_analysis_secs: CACHE_TTL_ANALYSIS_SECS,
            ttl_clusters_secs: CACHE_TTL_CLUSTERS_SECS,
            ttl_symbolic_secs: CACHE_TTL_SYMBOLIC_SECS,
        }
    }
}

impl CacheConfig {
    /// TTLs per cached value family
    pub fn ttls(&self) -> MatchCacheTtls {
        MatchCacheTtls {
            matches: Duration::from_secs(self.ttl_matches_secs),
            analysis: Duration::from_secs(self.ttl_analysis_secs),
            clusters: Duration::from_secs(self.ttl_clusters_secs),
            symbolic: Duration::from_secs(self.ttl_symbolic_secs),
        }
    }

    /// Registry lookup for the configured backend
    pub fn registry_config(&self) -> CacheProviderConfig {
        let mut config = CacheProviderConfig::new(&self.provider)
            .with_max_size(self.max_entries)
            .with_namespace(&self.namespace);
        if let Some(url) = &self.redis_url {
            config = config.with_uri(url);
        }
        config
    }
}
