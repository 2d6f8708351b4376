//! Tests for the cache providers

use std::time::Duration;

use kindred_domain::ports::{CacheEntryConfig, CacheProvider};
use kindred_providers::cache::{NullCacheProvider, TtlMemoryCacheProvider};

fn ttl(secs: u64) -> CacheEntryConfig {
    CacheEntryConfig::default().with_ttl_secs(secs)
}

#[tokio::test(start_paused = true)]
async fn test_ttl_memory_entry_expires_after_its_ttl() {
    let cache = TtlMemoryCacheProvider::new();
    cache.set_json("matches:u1", "[1]", ttl(60)).await.unwrap();

    tokio::time::advance(Duration::from_secs(59)).await;
    assert_eq!(cache.get_json("matches:u1").await.unwrap().as_deref(), Some("[1]"));

    tokio::time::advance(Duration::from_secs(2)).await;
    assert_eq!(cache.get_json("matches:u1").await.unwrap(), None);
    assert!(!cache.exists("matches:u1").await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_ttl_memory_entries_keep_their_own_ttl() {
    let cache = TtlMemoryCacheProvider::new();
    cache.set_json("short", "1", ttl(10)).await.unwrap();
    cache.set_json("long", "2", ttl(1000)).await.unwrap();

    tokio::time::advance(Duration::from_secs(11)).await;

    assert_eq!(cache.get_json("short").await.unwrap(), None);
    assert_eq!(cache.get_json("long").await.unwrap().as_deref(), Some("2"));
    assert_eq!(cache.size().await.unwrap(), 1);
}

#[tokio::test]
async fn test_ttl_memory_overwrite_replaces_value() {
    let cache = TtlMemoryCacheProvider::new();
    cache.set_json("k", "\"old\"", ttl(60)).await.unwrap();
    cache.set_json("k", "\"new\"", ttl(60)).await.unwrap();

    assert_eq!(cache.get_json("k").await.unwrap().as_deref(), Some("\"new\""));
    assert_eq!(cache.size().await.unwrap(), 1);
}

#[tokio::test]
async fn test_ttl_memory_invalidate_prefix_removes_only_matching_keys() {
    let cache = TtlMemoryCacheProvider::new();
    for key in ["matches:u1:a", "matches:u1:b", "matches:u2:a", "analysis:u1:u2"] {
        cache.set_json(key, "{}", ttl(60)).await.unwrap();
    }

    let removed = cache.invalidate_prefix("matches:u1:").await.unwrap();

    assert_eq!(removed, 2);
    assert!(!cache.exists("matches:u1:a").await.unwrap());
    assert!(cache.exists("matches:u2:a").await.unwrap());
    assert!(cache.exists("analysis:u1:u2").await.unwrap());
}

#[tokio::test]
async fn test_ttl_memory_stats_count_hits_and_misses() {
    let cache = TtlMemoryCacheProvider::new();
    cache.set_json("k", "1", ttl(60)).await.unwrap();

    cache.get_json("k").await.unwrap();
    cache.get_json("k").await.unwrap();
    cache.get_json("missing").await.unwrap();

    let stats = cache.stats().await.unwrap();
    assert_eq!(stats.hits, 2);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.entries, 1);
    assert!((stats.hit_rate - 2.0 / 3.0).abs() < 1e-9);
}

#[tokio::test(start_paused = true)]
async fn test_ttl_memory_evicts_soonest_expiring_entry_at_capacity() {
    let cache = TtlMemoryCacheProvider::with_capacity(2);
    cache.set_json("soon", "1", ttl(10)).await.unwrap();
    cache.set_json("later", "2", ttl(100)).await.unwrap();
    cache.set_json("newest", "3", ttl(50)).await.unwrap();

    assert_eq!(cache.size().await.unwrap(), 2);
    assert!(!cache.exists("soon").await.unwrap());
    assert!(cache.exists("later").await.unwrap());
    assert!(cache.exists("newest").await.unwrap());
}

#[tokio::test]
async fn test_ttl_memory_delete_and_clear() {
    let cache = TtlMemoryCacheProvider::new();
    cache.set_json("a", "1", ttl(60)).await.unwrap();
    cache.set_json("b", "2", ttl(60)).await.unwrap();

    assert!(cache.delete("a").await.unwrap());
    assert!(!cache.delete("a").await.unwrap());

    cache.clear().await.unwrap();
    assert_eq!(cache.size().await.unwrap(), 0);
}

#[tokio::test]
async fn test_null_cache_never_stores() {
    let cache = NullCacheProvider::new();
    cache.set_json("k", "1", ttl(60)).await.unwrap();

    assert_eq!(cache.get_json("k").await.unwrap(), None);
    assert_eq!(cache.invalidate_prefix("").await.unwrap(), 0);
    assert_eq!(cache.provider_name(), "null");
}

#[cfg(feature = "cache-moka")]
mod moka {
    use super::ttl;
    use kindred_domain::ports::CacheProvider;
    use kindred_providers::cache::MokaCacheProvider;

    #[tokio::test]
    async fn test_set_get_and_prefix_invalidation() {
        let cache = MokaCacheProvider::new();
        cache.set_json("clusters:u1", "[]", ttl(60)).await.unwrap();
        cache.set_json("clusters:u2", "[]", ttl(60)).await.unwrap();
        cache.set_json("matches:u1", "[]", ttl(60)).await.unwrap();

        assert_eq!(cache.get_json("clusters:u1").await.unwrap().as_deref(), Some("[]"));

        let removed = cache.invalidate_prefix("clusters:").await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(cache.get_json("clusters:u2").await.unwrap(), None);
        assert!(cache.exists("matches:u1").await.unwrap());
    }

    #[tokio::test]
    async fn test_stats_track_lookups() {
        let cache = MokaCacheProvider::new();
        cache.set_json("k", "1", ttl(60)).await.unwrap();
        cache.get_json("k").await.unwrap();
        cache.get_json("absent").await.unwrap();

        let stats = cache.stats().await.unwrap();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }
}

#[cfg(feature = "cache-redis")]
mod redis {
    use kindred_providers::cache::RedisCacheProvider;
    use kindred_providers::cache::redis::{escape_glob, prefix_pattern};

    #[test]
    fn test_escape_glob_escapes_metacharacters() {
        assert_eq!(escape_glob("matches:u1:"), "matches:u1:");
        assert_eq!(escape_glob("a*b?c[d]"), "a\\*b\\?c\\[d\\]");
    }

    #[test]
    fn test_namespace_prefixes_keys() {
        let provider = RedisCacheProvider::new("redis://127.0.0.1:6379")
            .unwrap()
            .with_namespace("kindred");
        assert_eq!(provider.namespaced("clusters:u1"), "kindred:clusters:u1");
    }

    #[test]
    fn test_namespace_scope_pattern_matches_only_namespaced_keys() {
        let provider = RedisCacheProvider::new("redis://127.0.0.1:6379")
            .unwrap()
            .with_namespace("kin*dred");
        assert_eq!(prefix_pattern(&provider.namespaced("")), "kin\\*dred:*");
        assert_eq!(
            prefix_pattern(&provider.namespaced("matches:u1:")),
            "kin\\*dred:matches:u1:*"
        );
    }

    #[test]
    fn test_invalid_url_is_a_configuration_error() {
        assert!(RedisCacheProvider::new("not a url").is_err());
    }
}
