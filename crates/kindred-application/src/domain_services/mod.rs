//! Domain Services
//!
//! Pure, synchronous algorithms. Callers on the async side move them onto
//! the blocking pool with `tokio::task::spawn_blocking`.

/// k-means clustering with elbow selection
pub mod clustering;
/// Multi-factor compatibility scoring
pub mod scoring;
/// Top-K ranking by mode
pub mod similarity;
/// Numeric vector primitives
pub mod vector_math;

pub use clustering::{ClusteringEngine, KMeansRun, select_k};
pub use scoring::{CompatibilityScorer, PartyProfile};
pub use similarity::{RankedCandidate, SimilarityIndex};
