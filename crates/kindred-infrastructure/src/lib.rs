//! # Infrastructure Layer
//!
//! Cross-cutting technical concerns that support the application and
//! domain layers.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Layered configuration (defaults, TOML, `KINDRED_*` env) |
//! | [`logging`] | Structured logging with tracing |
//! | [`bootstrap`] | Composition root wiring providers, services and jobs |
//! | [`error_ext`] | Context extension converting foreign errors |
//! | [`constants`] | Infrastructure defaults |

pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod error_ext;
pub mod logging;

// Re-export commonly used types
pub use bootstrap::{AppContext, Repositories, init_app, init_app_with};
pub use config::{AppConfig, ConfigLoader};
pub use error_ext::ErrorContext;
