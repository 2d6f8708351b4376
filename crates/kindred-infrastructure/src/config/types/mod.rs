//! Configuration types module

pub mod app;
pub mod cache;
pub mod logging;
pub mod providers;
pub mod timeouts;

// Re-export main types
pub use app::*;
