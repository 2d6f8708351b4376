//! External Provider Ports
//!
//! | Port | Description |
//! |------|-------------|
//! | [`EmbeddingProvider`] | Profile text to vector |
//! | [`SymbolicSummaryProvider`] | Astrological snapshot per user |
//! | [`NarrativeProvider`] | Match explanations and project ideas |
//! | [`CacheProvider`] | TTL key-value backend behind the match cache |

/// Cache provider port
pub mod cache;
/// Embedding provider port
pub mod embedding;
/// Narrative provider port
pub mod narrative;
/// Symbolic summary provider port
pub mod symbolic;

pub use cache::{CacheEntryConfig, CacheProvider, CacheStats};
pub use embedding::EmbeddingProvider;
pub use narrative::NarrativeProvider;
pub use symbolic::SymbolicSummaryProvider;
