//! # Domain Layer
//!
//! Core types, error taxonomy and port contracts for the Kindred
//! complementary matching engine. This crate holds no runtime and performs
//! no I/O: every collaborator (embedding generator, astrological
//! calculator, narrative generator, persistence, cache) is a trait here and
//! an adapter elsewhere.
//!
//! ## Architecture
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`entities`] | Users' embeddings, symbolic and personality snapshots, matches, clusters, jobs, projects |
//! | [`value_objects`] | Immutable configuration data (scoring tables, weights) and embedding vectors |
//! | [`ports`] | Provider contracts for external collaborators |
//! | [`repositories`] | Persistence contracts |
//! | [`error`] | Error taxonomy with retry classification |
//! | [`constants`] | Domain defaults |

/// Domain-level constants
pub mod constants;
/// Core business entities
pub mod entities;
/// Domain error types
pub mod error;
/// External provider port interfaces
pub mod ports;
/// Repository interfaces
pub mod repositories;
/// Immutable value objects
pub mod value_objects;

// Re-export commonly used types for convenience
pub use error::{Error, Result};
