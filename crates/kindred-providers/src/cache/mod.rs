//! Cache Provider Implementations
//!
//! ## Available Providers
//!
//! | Provider | Type | Description |
//! |----------|------|-------------|
//! | [`TtlMemoryCacheProvider`] | Local | Sharded TTL map with statistics |
//! | [`MokaCacheProvider`] | Local | Moka cache with per-entry TTL |
//! | [`RedisCacheProvider`] | Distributed | Redis-backed for multi-instance |
//! | [`NullCacheProvider`] | Testing | Caching disabled |
//!
//! ## Provider Selection Guide
//!
//! - **Development/Testing**: `ttl_memory`, or `null` to disable caching
//! - **Single Instance**: `moka` for bounded memory with eviction
//! - **Multi Instance**: `redis` so every instance sees the same entries

#[cfg(feature = "cache-moka")]
pub mod moka;
pub mod null;
#[cfg(feature = "cache-redis")]
pub mod redis;
pub mod ttl_memory;

#[cfg(feature = "cache-moka")]
pub use moka::MokaCacheProvider;
pub use null::NullCacheProvider;
#[cfg(feature = "cache-redis")]
pub use redis::RedisCacheProvider;
pub use ttl_memory::TtlMemoryCacheProvider;

pub use kindred_domain::ports::{CacheEntryConfig, CacheStats};
