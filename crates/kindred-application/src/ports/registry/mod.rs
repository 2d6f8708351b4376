//! Provider Registry System
//!
//! Compile-time registration of adapters with `linkme`:
//!
//! ```text
//! 1. Provider defines:  #[linkme::distributed_slice(CACHE_PROVIDERS)]
//!                       static ENTRY: CacheProviderEntry = ...
//! 2. Registry declares: #[linkme::distributed_slice]
//!                       pub static CACHE_PROVIDERS: [CacheProviderEntry] = [..]
//! 3. Resolver queries:  CACHE_PROVIDERS.iter()
//! 4. Config selects:    cache.provider = "moka" -> MokaCacheProvider
//! ```
//!
//! ## Registering a Provider (in kindred-providers)
//!
//! ```ignore
//! use kindred_application::ports::registry::{CacheProviderEntry, CACHE_PROVIDERS};
//!
//! #[linkme::distributed_slice(CACHE_PROVIDERS)]
//! static MOKA_PROVIDER: CacheProviderEntry = CacheProviderEntry {
//!     name: "moka",
//!     description: "Moka in-memory cache",
//!     factory: |config| Ok(Arc::new(MokaCacheProvider::from_config(config))),
//! };
//! ```

pub mod cache;
pub mod embedding;
pub mod narrative;

pub use cache::{
    CACHE_PROVIDERS, CacheProviderConfig, CacheProviderEntry, list_cache_providers,
    resolve_cache_provider,
};
pub use embedding::{
    EMBEDDING_PROVIDERS, EmbeddingProviderConfig, EmbeddingProviderEntry, list_embedding_providers,
    resolve_embedding_provider,
};
pub use narrative::{
    NARRATIVE_PROVIDERS, NarrativeProviderConfig, NarrativeProviderEntry, list_narrative_providers,
    resolve_narrative_provider,
};
