//! Embedding Provider Implementations
//!
//! | Provider | Description |
//! |----------|-------------|
//! | [`OpenAIEmbeddingProvider`] | OpenAI embeddings API |
//! | [`NullEmbeddingProvider`] | Deterministic hash-based vectors |

pub mod null;
#[cfg(feature = "embedding-openai")]
pub mod openai;

pub use null::NullEmbeddingProvider;
#[cfg(feature = "embedding-openai")]
pub use openai::OpenAIEmbeddingProvider;
