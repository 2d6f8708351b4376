//! Application Ports
//!
//! - [`services`]: interfaces of the application services, used by the
//!   job executor and the engine facade.
//! - [`registry`]: linkme slices through which provider crates register
//!   their adapters.
//!
//! Provider and repository traits are defined in `kindred-domain` and
//! re-exported here for convenience.

pub mod registry;
pub mod services;

pub use kindred_domain::ports::providers;
pub use kindred_domain::repositories;
pub use services::{
    ClusterServiceInterface, EmbeddingRefreshOutcome, EmbeddingServiceInterface, JobExecutor,
    MatchingServiceInterface, PairInsight, ProjectServiceInterface,
};
