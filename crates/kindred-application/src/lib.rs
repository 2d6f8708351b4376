//! Application Layer - Kindred
//!
//! Implements the matching core on top of the domain contracts:
//!
//! - `domain_services`: pure algorithms (vector math, similarity ranking,
//!   k-means clustering, compatibility scoring). They never suspend.
//! - `use_cases`: the match cache and the services behind every engine
//!   operation (matching, clusters, embedding refresh, projects).
//! - `jobs`: the job orchestrator with per-kind concurrency, retry and
//!   coalescing.
//! - `ports`: service interfaces and provider registries.
//!
//! ## Dependencies
//!
//! This crate depends only on `kindred-domain` and pure Rust libraries;
//! adapters arrive through constructor injection.

pub mod domain_services;
pub mod jobs;
pub mod ports;
pub mod timeouts;
pub mod use_cases;

pub use domain_services::*;
pub use jobs::*;
pub use use_cases::*;
