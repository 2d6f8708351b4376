//! Configuration
//!
//! [`AppConfig`] is assembled by [`ConfigLoader`] from three layers, later
//! ones overriding earlier ones:
//!
//! 1. `AppConfig::default()`
//! 2. `kindred.toml` (explicit path, or discovered)
//! 3. `KINDRED_*` environment variables, `__` between nested keys

pub mod loader;
pub mod types;

pub use loader::{ConfigBuilder, ConfigLoader};
pub use types::*;
