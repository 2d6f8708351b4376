//! Constants Tests

use kindred_infrastructure::constants::{
    CACHE_TTL_MATCHES_SECS, CACHE_TTL_SYMBOLIC_SECS, CONFIG_ENV_PREFIX, CONFIG_ENV_SEPARATOR,
    DEFAULT_CONFIG_FILENAME, EMBEDDING_TIMEOUT_SECS, LOG_ENV_VAR, PERSISTENCE_TIMEOUT_SECS,
};

#[test]
fn test_config_naming() {
    assert_eq!(CONFIG_ENV_PREFIX, "KINDRED");
    assert_eq!(CONFIG_ENV_SEPARATOR, "__");
    assert_eq!(DEFAULT_CONFIG_FILENAME, "kindred.toml");
    assert!(LOG_ENV_VAR.starts_with(CONFIG_ENV_PREFIX));
}

#[test]
fn test_symbolic_summaries_outlive_match_lists() {
    assert!(CACHE_TTL_SYMBOLIC_SECS > CACHE_TTL_MATCHES_SECS);
    assert_eq!(CACHE_TTL_SYMBOLIC_SECS, 24 * 60 * 60);
}

#[test]
fn test_io_deadlines() {
    assert_eq!(EMBEDDING_TIMEOUT_SECS, 10);
    assert_eq!(PERSISTENCE_TIMEOUT_SECS, 5);
}
