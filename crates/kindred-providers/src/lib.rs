//! # Kindred - Provider Implementations
//!
//! Adapters for every collaborator the matching core consumes. Each
//! provider implements a port (trait) defined in `kindred-domain` and the
//! selectable ones register themselves in the `linkme` registries declared
//! by `kindred-application`.
//!
//! ## Provider Categories
//!
//! | Category | Port | Implementations |
//! |----------|------|-----------------|
//! | Cache | `CacheProvider` | TtlMemory, Moka, Redis, Null |
//! | Embedding | `EmbeddingProvider` | OpenAI, Null |
//! | Narrative | `NarrativeProvider` | OpenAI, Template |
//! | Symbolic | `SymbolicSummaryProvider` | Memory |
//! | Persistence | `*Repository` | Memory |
//!
//! ## Feature Flags
//!
//! ```toml
//! [dependencies]
//! kindred-providers = { version = "0.1", default-features = false, features = ["cache-redis", "narrative-template"] }
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use kindred_providers::cache::MokaCacheProvider;
//! use kindred_providers::embedding::NullEmbeddingProvider;
//! use kindred_providers::repository::MemoryEmbeddingRepository;
//! ```

// Re-export kindred-domain types commonly used with providers
pub use kindred_domain::error::{Error, Result};
pub use kindred_domain::ports::{
    CacheProvider, EmbeddingProvider, NarrativeProvider, SymbolicSummaryProvider,
};

/// Provider-specific constants
pub mod constants;

/// Shared utilities for provider implementations
pub mod utils;

/// HTTP client construction for API-based providers
pub mod http;

/// Cache provider implementations
///
/// Implements `CacheProvider` for local and distributed backends.
pub mod cache;

/// Embedding provider implementations
pub mod embedding;

/// Narrative provider implementations
pub mod narrative;

/// Symbolic summary provider implementations
pub mod symbolic;

/// Repository implementations
pub mod repository;
