//! Repository Implementations
//!
//! | Repository | Implementation |
//! |------------|----------------|
//! | `EmbeddingRepository` | [`MemoryEmbeddingRepository`] |
//! | `ClusterRepository` | [`MemoryClusterRepository`] |
//! | `ProfileRepository` | [`MemoryProfileRepository`] |
//! | `MatchRepository` | [`MemoryMatchRepository`] |
//! | `JobRepository` | [`MemoryJobRepository`] |
//! | `ProjectRepository` | [`MemoryProjectRepository`] |

pub mod memory;

pub use memory::{
    MemoryClusterRepository, MemoryEmbeddingRepository, MemoryJobRepository,
    MemoryMatchRepository, MemoryProfileRepository, MemoryProjectRepository,
};
