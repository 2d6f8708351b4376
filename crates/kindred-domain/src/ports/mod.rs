//! Domain Port Interfaces
//!
//! Contracts between the matching core and the collaborators it consumes.
//! High-level code depends on these traits; adapters in `kindred-providers`
//! implement them and the composition root injects them.

/// External service provider ports
pub mod providers;

pub use providers::{
    CacheEntryConfig, CacheProvider, CacheStats, EmbeddingProvider, NarrativeProvider,
    SymbolicSummaryProvider,
};
