//! Provider Constants
//!
//! Constants specific to provider implementations. Domain constants live in
//! `kindred-domain`.

// ============================================================================
// EMBEDDING PROVIDER CONSTANTS
// ============================================================================

/// Null embedding provider dimension (for testing)
pub const EMBEDDING_DIMENSION_NULL: usize = 384;

/// OpenAI text-embedding-3-small dimension
pub const EMBEDDING_DIMENSION_OPENAI_SMALL: usize = 1536;

/// OpenAI text-embedding-3-large dimension
pub const EMBEDDING_DIMENSION_OPENAI_LARGE: usize = 3072;

/// OpenAI text-embedding-ada-002 dimension
pub const EMBEDDING_DIMENSION_OPENAI_ADA: usize = 1536;

/// Default OpenAI embedding model
pub const OPENAI_EMBEDDING_MODEL_DEFAULT: &str = "text-embedding-3-small";

// ============================================================================
// NARRATIVE PROVIDER CONSTANTS
// ============================================================================

/// Default OpenAI chat model
pub const OPENAI_CHAT_MODEL_DEFAULT: &str = "gpt-4o-mini";

/// Default OpenAI API base URL
pub const OPENAI_BASE_URL_DEFAULT: &str = "https://api.openai.com/v1";

/// Sampling temperature for narrative generation
pub const NARRATIVE_TEMPERATURE: f64 = 0.7;

// ============================================================================
// CACHE PROVIDER CONSTANTS
// ============================================================================

/// Default maximum number of entries for in-process caches
pub const CACHE_DEFAULT_MAX_ENTRIES: usize = 10_000;

/// Default Redis URL
pub const REDIS_DEFAULT_URL: &str = "redis://localhost:6379";

/// Keys fetched per SCAN round trip during prefix invalidation
pub const REDIS_SCAN_COUNT: usize = 500;

/// Separator between the namespace and the key
pub const CACHE_NAMESPACE_SEPARATOR: &str = ":";

// ============================================================================
// HTTP CONSTANTS
// ============================================================================

/// JSON content type
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Default HTTP request timeout
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum idle connections per host
pub const HTTP_MAX_IDLE_PER_HOST: usize = 10;

/// Idle connection timeout
pub const HTTP_CLIENT_IDLE_TIMEOUT_SECS: u64 = 90;
