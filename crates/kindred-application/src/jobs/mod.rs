//! Background Jobs
//!
//! | Kind | Concurrency | Retry |
//! |------|-------------|-------|
//! | embedding refresh | 3 | 3 attempts, exponential from 1 s |
//! | match recalculation | 2 | 2 attempts, fixed 5 s |
//! | cluster recomputation | 2 | 2 attempts, fixed 5 s |
//! | project generation | 2 | 2 attempts, immediate |

/// Payload dispatch onto the application services
pub mod executor;
/// Scheduling, coalescing and retries
pub mod orchestrator;
/// Retry and concurrency policies
pub mod retry;

pub use executor::ServiceJobExecutor;
pub use orchestrator::{JobHandle, JobOrchestrator, SHUTTING_DOWN};
pub use retry::{Backoff, JobPolicies, JobPolicy, RetryPolicy};
