//! Symbolic Summary Provider Implementations
//!
//! Chart arithmetic happens outside the engine; these adapters only serve
//! the resulting snapshots.

pub mod memory;

pub use memory::MemorySymbolicProvider;
