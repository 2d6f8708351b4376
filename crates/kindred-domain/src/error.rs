//! Error handling types

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Text shown to end users whenever a matching request cannot be served.
///
/// Internal error detail never leaves the engine through this path.
pub const USER_FACING_UNAVAILABLE: &str = "matches temporarily unavailable, retry";

/// Main error type for the Kindred matching engine
#[derive(Error, Debug)]
pub enum Error {
    /// Two vectors of different length were compared (always a caller bug)
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension of the left-hand / reference vector
        expected: usize,
        /// Dimension of the offending vector
        actual: usize,
    },

    /// An operation that needs at least one element received none
    #[error("Empty input: {context}")]
    EmptyInput {
        /// What was empty
        context: String,
    },

    /// Not enough points to run a population-level computation
    #[error("Insufficient data: {required} embeddings required, {available} available")]
    InsufficientData {
        /// Minimum population size
        required: usize,
        /// Population size found
        available: usize,
    },

    /// No embedding stored for the user
    #[error("Embedding not found for user {user_id}")]
    EmbeddingNotFound {
        /// The user without an embedding
        user_id: String,
    },

    /// An external collaborator (embedding, astrology, narrative) failed
    #[error("External service error ({service}): {message}")]
    ExternalService {
        /// Collaborator name
        service: String,
        /// Description of the failure
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An I/O boundary call exceeded its deadline
    #[error("Operation '{operation}' timed out after {timeout:?}")]
    Timeout {
        /// The bounded operation
        operation: String,
        /// Deadline that elapsed
        timeout: Duration,
    },

    /// A background job exhausted its retries
    #[error("Job {job_id} ({kind}) failed after {attempts} attempt(s): {last_error}")]
    JobTerminalFailure {
        /// Identity of the failed job
        job_id: String,
        /// Job kind label
        kind: String,
        /// Attempts made
        attempts: u32,
        /// Rendered last error
        last_error: String,
        /// The error that ended the last attempt
        #[source]
        cause: Option<Arc<Error>>,
    },

    /// Resource not found error
    #[error("Not found: {resource}")]
    NotFound {
        /// The resource that was not found
        resource: String,
    },

    /// Invalid argument provided to a function
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument
        message: String,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Cache operation error
    #[error("Cache error: {message}")]
    Cache {
        /// Description of the cache error
        message: String,
    },

    /// Persistence layer error
    #[error("Persistence error: {message}")]
    Persistence {
        /// Description of the persistence error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// JSON parsing or serialization error
    #[error("JSON parsing error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

// Algorithmic error creation methods
impl Error {
    /// Create a dimension mismatch error
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    /// Create an empty input error
    pub fn empty_input<S: Into<String>>(context: S) -> Self {
        Self::EmptyInput {
            context: context.into(),
        }
    }

    /// Create an insufficient data error
    pub fn insufficient_data(required: usize, available: usize) -> Self {
        Self::InsufficientData {
            required,
            available,
        }
    }

    /// Create an embedding-not-found error
    pub fn embedding_not_found<S: Into<String>>(user_id: S) -> Self {
        Self::EmbeddingNotFound {
            user_id: user_id.into(),
        }
    }
}

// External collaborator error creation methods
impl Error {
    /// Create an external service error
    pub fn external_service<S: Into<String>, M: Into<String>>(service: S, message: M) -> Self {
        Self::ExternalService {
            service: service.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create an external service error with source
    pub fn external_service_with_source<
        S: Into<String>,
        M: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        service: S,
        message: M,
        source: E,
    ) -> Self {
        Self::ExternalService {
            service: service.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a timeout error
    pub fn timeout<S: Into<String>>(operation: S, timeout: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout,
        }
    }
}

// Basic error creation methods
impl Error {
    /// Create a not found error
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Create a persistence error
    pub fn persistence<S: Into<String>>(message: S) -> Self {
        Self::Persistence {
            message: message.into(),
            source: None,
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

// Classification
impl Error {
    /// Whether a background job should try again after this error.
    ///
    /// Caller bugs (dimension mismatch, bad arguments) and data conditions
    /// (insufficient population, missing embedding) are never retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ExternalService { .. }
                | Self::Timeout { .. }
                | Self::Persistence { .. }
                | Self::Cache { .. }
        )
    }

    /// Whether this error came from a collaborator outside the core
    pub fn is_external(&self) -> bool {
        matches!(self, Self::ExternalService { .. } | Self::Timeout { .. })
    }

    /// Copy of a variant that holds plain data only.
    ///
    /// `None` for variants that own a foreign source error.
    pub fn duplicate(&self) -> Option<Self> {
        Some(match self {
            Self::DimensionMismatch { expected, actual } => {
                Self::dimension_mismatch(*expected, *actual)
            }
            Self::EmptyInput { context } => Self::empty_input(context.clone()),
            Self::InsufficientData {
                required,
                available,
            } => Self::insufficient_data(*required, *available),
            Self::EmbeddingNotFound { user_id } => Self::embedding_not_found(user_id.clone()),
            Self::Timeout { operation, timeout } => Self::timeout(operation.clone(), *timeout),
            Self::NotFound { resource } => Self::not_found(resource.clone()),
            Self::InvalidArgument { message } => Self::invalid_argument(message.clone()),
            Self::Cache { message } => Self::cache(message.clone()),
            Self::Internal { message } => Self::internal(message.clone()),
            Self::ExternalService { .. }
            | Self::JobTerminalFailure { .. }
            | Self::Configuration { .. }
            | Self::Persistence { .. }
            | Self::Json { .. } => return None,
        })
    }

    /// Unwrap a job failure caused by a non-retryable condition into that
    /// condition; any other error is returned unchanged
    #[must_use]
    pub fn into_job_cause(self) -> Self {
        let cause = match &self {
            Self::JobTerminalFailure {
                cause: Some(cause), ..
            } if !cause.is_retryable() => cause.duplicate(),
            _ => None,
        };
        cause.unwrap_or(self)
    }

    /// Public, detail-free message for end users
    pub fn user_message(&self) -> &'static str {
        USER_FACING_UNAVAILABLE
    }
}
