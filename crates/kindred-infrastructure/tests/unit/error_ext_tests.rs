//! Error Extension Tests

use std::io;

use kindred_domain::error::{Error, Result};
use kindred_infrastructure::error_ext::ErrorContext;

fn io_failure() -> std::result::Result<(), io::Error> {
    Err(io::Error::new(io::ErrorKind::NotFound, "file not found"))
}

#[test]
fn test_config_context_keeps_source() {
    let result: Result<()> = io_failure().config_context("failed to read kindred.toml");

    match result {
        Err(Error::Configuration { message, source }) => {
            assert!(message.contains("failed to read kindred.toml"));
            assert!(message.contains("file not found"));
            assert!(source.is_some());
        }
        other => panic!("Expected Configuration error, got {other:?}"),
    }
}

#[test]
fn test_context_is_internal() {
    let result: Result<()> = io_failure().context("loading fixtures");
    assert!(matches!(result, Err(Error::Internal { message }) if message.starts_with("loading fixtures: ")));
}

#[test]
fn test_with_context_is_lazy() {
    let ok: std::result::Result<u8, io::Error> = Ok(7);
    let value = ok
        .with_context(|| -> String { panic!("context must not be built on success") })
        .unwrap();
    assert_eq!(value, 7);

    let result: Result<()> = io_failure().with_context(|| format!("user {}", "u1"));
    assert!(matches!(result, Err(Error::Internal { message }) if message.contains("user u1")));
}

#[test]
fn test_cache_and_persistence_contexts_are_retryable() {
    let cache: Result<()> = io_failure().cache_context("redis get");
    let cache = cache.unwrap_err();
    assert!(matches!(cache, Error::Cache { .. }));
    assert!(cache.is_retryable());

    let persistence: Result<()> = io_failure().persistence_context("put embedding");
    let persistence = persistence.unwrap_err();
    assert!(matches!(persistence, Error::Persistence { source: Some(_), .. }));
    assert!(persistence.is_retryable());
}

#[test]
fn test_configuration_errors_are_not_retryable() {
    let result: Result<()> = io_failure().config_context("bad file");
    assert!(!result.unwrap_err().is_retryable());
}
