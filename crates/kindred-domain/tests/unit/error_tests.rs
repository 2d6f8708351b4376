//! Unit tests for domain error types

use kindred_domain::Error;
use std::sync::Arc;
use std::time::Duration;

#[test]
fn test_dimension_mismatch_error() {
    let error = Error::dimension_mismatch(3, 4);
    match error {
        Error::DimensionMismatch { expected, actual } => {
            assert_eq!(expected, 3);
            assert_eq!(actual, 4);
        }
        _ => panic!("Expected DimensionMismatch error"),
    }
}

#[test]
fn test_insufficient_data_display() {
    let error = Error::insufficient_data(10, 9);
    let display = error.to_string();
    assert!(display.contains("10"));
    assert!(display.contains('9'));
}

#[test]
fn test_retryable_classification() {
    assert!(Error::external_service("openai", "503").is_retryable());
    assert!(Error::timeout("embed", Duration::from_secs(10)).is_retryable());
    assert!(Error::persistence("write failed").is_retryable());
    assert!(Error::cache("redis down").is_retryable());

    assert!(!Error::dimension_mismatch(2, 3).is_retryable());
    assert!(!Error::insufficient_data(10, 3).is_retryable());
    assert!(!Error::invalid_argument("bad").is_retryable());
    assert!(!Error::embedding_not_found("u1").is_retryable());
    assert!(!Error::empty_input("centroid").is_retryable());
}

#[test]
fn test_user_message_hides_detail() {
    let error = Error::external_service("openai", "api key sk-secret rejected");
    let message = error.user_message();
    assert_eq!(message, "matches temporarily unavailable, retry");
    assert!(!message.contains("sk-secret"));
}

#[test]
fn test_external_service_with_source() {
    let io = std::io::Error::other("connection reset");
    let error = Error::external_service_with_source("narrative", "request failed", io);
    assert!(error.is_external());
    assert!(std::error::Error::source(&error).is_some());
}

#[test]
fn test_json_error_conversion() {
    let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
    let error: Error = parse.unwrap_err().into();
    assert!(matches!(error, Error::Json { .. }));
}

fn job_failure(cause: Error) -> Error {
    Error::JobTerminalFailure {
        job_id: "job-1".to_string(),
        kind: "cluster_recomputation".to_string(),
        attempts: 1,
        last_error: cause.to_string(),
        cause: Some(Arc::new(cause)),
    }
}

#[test]
fn test_job_failure_exposes_cause_as_source() {
    let error = job_failure(Error::insufficient_data(10, 9));
    let source = std::error::Error::source(&error).map(ToString::to_string);
    assert_eq!(source, Some(Error::insufficient_data(10, 9).to_string()));
}

#[test]
fn test_into_job_cause_unwraps_non_retryable_cause() {
    let error = job_failure(Error::insufficient_data(10, 9)).into_job_cause();
    assert!(matches!(
        error,
        Error::InsufficientData {
            required: 10,
            available: 9
        }
    ));
}

#[test]
fn test_into_job_cause_keeps_retryable_failure() {
    let error = job_failure(Error::timeout("embed", Duration::from_secs(1))).into_job_cause();
    assert!(matches!(error, Error::JobTerminalFailure { attempts: 1, .. }));

    let error = job_failure(Error::external_service("openai", "503")).into_job_cause();
    assert!(matches!(error, Error::JobTerminalFailure { .. }));
}

#[test]
fn test_into_job_cause_leaves_other_errors_alone() {
    let error = Error::not_found("user u1").into_job_cause();
    assert!(matches!(error, Error::NotFound { .. }));
}
