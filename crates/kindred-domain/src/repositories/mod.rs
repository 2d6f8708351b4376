//! Repository Interfaces
//!
//! Storage-agnostic persistence contracts. Embedding and cluster stores are
//! replace-only: a write supersedes the previous value for the key (or the
//! previous generation) as a whole, so readers always see a complete value.
//!
//! | Repository | Description |
//! |------------|-------------|
//! | [`EmbeddingRepository`] | Embeddings keyed by user |
//! | [`ClusterRepository`] | Current cluster generation |
//! | [`ProfileRepository`] | Personality profiles and profile documents |
//! | [`MatchRepository`] | Match interests and match audit records |
//! | [`JobRepository`] | Job records |
//! | [`ProjectRepository`] | Generated project ideas |

/// Cluster generation repository interface
pub mod cluster_repository;
/// Embedding repository interface
pub mod embedding_repository;
/// Job repository interface
pub mod job_repository;
/// Match repository interface
pub mod match_repository;
/// Profile repository interface
pub mod profile_repository;
/// Project repository interface
pub mod project_repository;

pub use cluster_repository::ClusterRepository;
pub use embedding_repository::EmbeddingRepository;
pub use job_repository::JobRepository;
pub use match_repository::MatchRepository;
pub use profile_repository::ProfileRepository;
pub use project_repository::ProjectRepository;
