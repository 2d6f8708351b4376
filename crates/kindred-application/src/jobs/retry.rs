//! Retry and concurrency policy per job kind

use std::time::Duration;

use serde::{Deserialize, Serialize};

use kindred_domain::entities::JobKind;
use kindred_domain::error::{Error, Result};

/// Longest wait between two attempts
pub const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Wait before the next attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum Backoff {
    /// `initial_ms * 2^(n - 1)` after the n-th failed attempt
    Exponential {
        /// Wait after the first failure, in milliseconds
        initial_ms: u64,
    },
    /// The same wait after every failure
    Fixed {
        /// Wait in milliseconds
        delay_ms: u64,
    },
    /// Retry right away
    Immediate,
}

impl Backoff {
    /// Wait after the `attempt`-th failed attempt (1-based), capped at
    /// [`MAX_BACKOFF`]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let delay = match *self {
            Self::Exponential { initial_ms } => {
                let factor = 1_u64
                    .checked_shl(attempt.saturating_sub(1))
                    .unwrap_or(u64::MAX);
                Duration::from_millis(initial_ms.saturating_mul(factor))
            }
            Self::Fixed { delay_ms } => Duration::from_millis(delay_ms),
            Self::Immediate => Duration::ZERO,
        };
        delay.min(MAX_BACKOFF)
    }
}

/// Attempt budget and backoff of one job kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Wait between attempts
    pub backoff: Backoff,
}

impl RetryPolicy {
    /// Exponential backoff policy
    pub fn exponential(max_attempts: u32, initial: Duration) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Exponential {
                initial_ms: duration_ms(initial),
            },
        }
    }

    /// Fixed backoff policy
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Fixed {
                delay_ms: duration_ms(delay),
            },
        }
    }

    /// Policy retrying without waiting
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Immediate,
        }
    }

    /// Whether a failure of attempt `attempt` (1-based) should be retried
    pub fn should_retry(&self, attempt: u32, error: &Error) -> bool {
        attempt < self.max_attempts && error.is_retryable()
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Scheduling policy of one job kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPolicy {
    /// Jobs of this kind allowed to run at once
    pub concurrency: usize,
    /// Retry behaviour
    pub retry: RetryPolicy,
}

impl JobPolicy {
    /// Reject policies the orchestrator cannot run
    pub fn validate(&self, kind: JobKind) -> Result<()> {
        if self.concurrency == 0 {
            return Err(Error::configuration(format!(
                "jobs.{kind}.concurrency must be at least 1"
            )));
        }
        if self.retry.max_attempts == 0 {
            return Err(Error::configuration(format!(
                "jobs.{kind}.retry.max_attempts must be at least 1"
            )));
        }
        Ok(())
    }
}

/// Policies of every job kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobPolicies {
    /// Embedding refresh
    pub embedding_refresh: JobPolicy,
    /// Match recalculation
    pub match_recalculation: JobPolicy,
    /// Cluster recomputation
    pub cluster_recomputation: JobPolicy,
    /// Project generation
    pub project_generation: JobPolicy,
}

impl Default for JobPolicies {
    fn default() -> Self {
        Self {
            embedding_refresh: JobPolicy {
                concurrency: 3,
                retry: RetryPolicy::exponential(3, Duration::from_secs(1)),
            },
            match_recalculation: JobPolicy {
                concurrency: 2,
                retry: RetryPolicy::fixed(2, Duration::from_secs(5)),
            },
            cluster_recomputation: JobPolicy {
                concurrency: 2,
                retry: RetryPolicy::fixed(2, Duration::from_secs(5)),
            },
            project_generation: JobPolicy {
                concurrency: 2,
                retry: RetryPolicy::immediate(2),
            },
        }
    }
}

impl JobPolicies {
    /// Policy of `kind`
    pub fn for_kind(&self, kind: JobKind) -> &JobPolicy {
        match kind {
            JobKind::EmbeddingRefresh => &self.embedding_refresh,
            JobKind::MatchRecalculation => &self.match_recalculation,
            JobKind::ClusterRecomputation => &self.cluster_recomputation,
            JobKind::ProjectGeneration => &self.project_generation,
        }
    }

    /// Validate every policy
    pub fn validate(&self) -> Result<()> {
        JobKind::ALL
            .iter()
            .try_for_each(|kind| self.for_kind(*kind).validate(*kind))
    }
}
