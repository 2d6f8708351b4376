//! Domain Entities
//!
//! Entities carry identity (a user id, a job id, a generation id) and are
//! exchanged between the services, the cache and the persistence ports.
//!
//! | Entity | Description |
//! |--------|-------------|
//! | [`UserEmbedding`] | A user's profile vector, superseded on refresh |
//! | [`SymbolicSummary`] | Astrological snapshot: element, archetype, aspects |
//! | [`PersonalityProfile`] | Dominant colour and trait set |
//! | [`ProfileDocument`] | Structured profile text fed to the embedding generator |
//! | [`Cluster`] / [`ClusterGeneration`] | One k-means run over the population |
//! | [`Match`] | A scored pairing with its breakdown |
//! | [`DetailedAnalysis`] | A match with descriptive labels and narrative |
//! | [`Job`] | Background computation record |
//! | [`ProjectIdea`] | Collaborative project proposed for a pair |

/// Match analysis entities
pub mod analysis;
/// Cluster entities
pub mod cluster;
/// User embedding entity
pub mod embedding;
/// Background job entities
pub mod job;
/// Match entities and request parameters
pub mod matching;
/// Personality and profile document entities
pub mod personality;
/// Collaborative project entities
pub mod project;
/// Astrological symbolic summary entities
pub mod symbolic;

pub use analysis::{
    AspectDescription, DetailedAnalysis, ElementRelation, PercentageBreakdown, as_percentage,
};
pub use cluster::{Cluster, ClusterAnalysis, ClusterGeneration, ClusterMatch, ElbowPoint};
pub use embedding::UserEmbedding;
pub use job::{Job, JobKind, JobOutput, JobPayload, JobStatus};
pub use matching::{
    Match, MatchFilters, MatchInterest, MatchRecord, MatchStrategy, MatchType, ScoreBreakdown,
};
pub use personality::{Color, PersonalityProfile, ProfileDocument, TraitPair};
pub use project::{ProjectContext, ProjectIdea};
pub use symbolic::{
    Archetype, Aspect, AspectKind, AspectNature, Element, Placement, Planet, SymbolicSummary,
};
