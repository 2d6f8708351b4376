//! Infrastructure layer constants
//!
//! Contains constants that are part of the infrastructure implementation.
//! Algorithm defaults live in `kindred_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "kindred.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "kindred";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "KINDRED";

/// Separator between nested keys in environment variable names
///
/// `KINDRED_CACHE__TTL_MATCHES_SECS` sets `cache.ttl_matches_secs`.
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Environment variable overriding the configured log filter
pub const LOG_ENV_VAR: &str = "KINDRED_LOG";

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// File name prefix used when the log path has no stem
pub const DEFAULT_LOG_FILE_STEM: &str = "kindred";

// ============================================================================
// CACHE CONSTANTS
// ============================================================================

/// Default cache provider
pub const DEFAULT_CACHE_PROVIDER: &str = "ttl_memory";

/// Default key namespace
pub const DEFAULT_CACHE_NAMESPACE: &str = "kindred";

/// Default entry bound of local caches
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 10_000;

/// Match list TTL in seconds (1 hour)
pub const CACHE_TTL_MATCHES_SECS: u64 = 3600;

/// Detailed analysis TTL in seconds (1 hour)
pub const CACHE_TTL_ANALYSIS_SECS: u64 = 3600;

/// Cross-cluster recommendation TTL in seconds (1 hour)
pub const CACHE_TTL_CLUSTERS_SECS: u64 = 3600;

/// Symbolic summary TTL in seconds (24 hours)
pub const CACHE_TTL_SYMBOLIC_SECS: u64 = 86_400;

// ============================================================================
// PROVIDER CONSTANTS
// ============================================================================

/// Default embedding generator
pub const DEFAULT_EMBEDDING_PROVIDER: &str = "null";

/// Default narrative generator
pub const DEFAULT_NARRATIVE_PROVIDER: &str = "template";

// ============================================================================
// TIMEOUT CONSTANTS
// ============================================================================

/// Embedding generator deadline in seconds
pub const EMBEDDING_TIMEOUT_SECS: u64 = 10;

/// Astrological calculator deadline in seconds
pub const ASTROLOGY_TIMEOUT_SECS: u64 = 5;

/// Narrative generator deadline in seconds
pub const NARRATIVE_TIMEOUT_SECS: u64 = 30;

/// Persistence deadline in seconds
pub const PERSISTENCE_TIMEOUT_SECS: u64 = 5;
