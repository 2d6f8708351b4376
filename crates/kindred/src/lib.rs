//! # Kindred
//!
//! Complementary matching and clustering engine. Users are ranked against
//! each other by fusing embedding similarity, astrological synergy and
//! personality complementarity into one bounded score; the population is
//! clustered into cohorts with k-means and an elbow-selected k.
//!
//! ## Example
//!
//! ```ignore
//! use kindred::{AppConfig, Engine, MatchFilters, MatchStrategy};
//!
//! let engine = Engine::new(AppConfig::default())?;
//! engine.enqueue_embedding_refresh("u1", false)?.wait().await?;
//! let matches = engine
//!     .find_matches("u1", MatchStrategy::Complementary, 10, &MatchFilters::default())
//!     .await?;
//! ```
//!
//! ## Architecture
//!
//! - `domain` - entities, error taxonomy and port traits
//! - `application` - algorithms, use cases and the job orchestrator
//! - `infrastructure` - configuration, logging and the composition root
//! - `providers` - cache, embedding, narrative and persistence adapters

/// Domain layer - core types, errors and ports
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use kindred_domain::*;
}

/// Application layer - algorithms, use cases and jobs
pub mod application {
    pub use kindred_application::*;
}

/// Infrastructure layer - configuration, logging and wiring
pub mod infrastructure {
    pub use kindred_infrastructure::*;
}

/// Provider implementations
pub mod providers {
    pub use kindred_providers::*;
}

mod engine;

pub use engine::Engine;

// Re-export commonly used types at the crate root
pub use kindred_application::jobs::JobHandle;
pub use kindred_domain::entities::{
    ClusterAnalysis, ClusterGeneration, ClusterMatch, DetailedAnalysis, Job, JobKind, JobOutput,
    JobStatus, Match, MatchFilters, MatchStrategy, MatchType, PersonalityProfile, ProfileDocument,
    ProjectIdea, SymbolicSummary,
};
pub use kindred_domain::error::{Error, Result, USER_FACING_UNAVAILABLE};
pub use kindred_infrastructure::config::{AppConfig, ConfigLoader};
pub use kindred_infrastructure::logging::init_logging;
