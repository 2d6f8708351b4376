//! Background job entities
//!
//! A job moves strictly forward: `queued -> running -> {succeeded, failed}`.
//! Re-running a failed computation creates a new job with a fresh id that
//! shares the old one's logical key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::cluster::ClusterGeneration;
use super::matching::{Match, MatchStrategy};
use super::project::ProjectIdea;
use crate::error::{Error, Result};

/// Kind of background computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    /// Regenerate one user's embedding
    EmbeddingRefresh,
    /// Recompute one user's match list
    MatchRecalculation,
    /// Recluster the whole population
    ClusterRecomputation,
    /// Propose projects for a pair
    ProjectGeneration,
}

impl JobKind {
    /// All kinds
    pub const ALL: [Self; 4] = [
        Self::EmbeddingRefresh,
        Self::MatchRecalculation,
        Self::ClusterRecomputation,
        Self::ProjectGeneration,
    ];

    /// Snake-case label
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EmbeddingRefresh => "embedding_refresh",
            Self::MatchRecalculation => "match_recalculation",
            Self::ClusterRecomputation => "cluster_recomputation",
            Self::ProjectGeneration => "project_generation",
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobPayload {
    /// Regenerate one user's embedding
    EmbeddingRefresh {
        /// Target user
        user_id: String,
        /// Regenerate even when an embedding exists
        force_refresh: bool,
    },
    /// Recompute one user's match list
    MatchRecalculation {
        /// Target user
        user_id: String,
        /// Ranking strategy
        strategy: MatchStrategy,
        /// Maximum matches
        limit: usize,
    },
    /// Recluster the population
    ClusterRecomputation,
    /// Propose projects for a pair
    ProjectGeneration {
        /// First partner
        user_id: String,
        /// Second partner
        partner_id: String,
        /// Ideas requested
        count: usize,
    },
}

impl JobPayload {
    /// Kind of the payload
    pub fn kind(&self) -> JobKind {
        match self {
            Self::EmbeddingRefresh { .. } => JobKind::EmbeddingRefresh,
            Self::MatchRecalculation { .. } => JobKind::MatchRecalculation,
            Self::ClusterRecomputation => JobKind::ClusterRecomputation,
            Self::ProjectGeneration { .. } => JobKind::ProjectGeneration,
        }
    }

    /// Logical key; at most one job per key runs at a time
    pub fn key(&self) -> String {
        match self {
            Self::EmbeddingRefresh { user_id, .. } => format!("embedding:{user_id}"),
            Self::MatchRecalculation {
                user_id,
                strategy,
                limit,
            } => format!("matching:{user_id}:{strategy}:{limit}"),
            Self::ClusterRecomputation => "clusters".to_string(),
            Self::ProjectGeneration {
                user_id,
                partner_id,
                ..
            } => format!("projects:{user_id}:{partner_id}"),
        }
    }

    /// Whether running `self` also satisfies a request for `other`.
    ///
    /// A forced embedding refresh covers a plain one for the same user but
    /// not the other way round.
    pub fn covers(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::EmbeddingRefresh {
                    user_id: ours,
                    force_refresh: forced,
                },
                Self::EmbeddingRefresh {
                    user_id: theirs,
                    force_refresh: wanted,
                },
            ) => ours == theirs && (*forced || !*wanted),
            _ => self == other,
        }
    }
}

/// Lifecycle state of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Accepted, waiting for a worker slot
    Queued,
    /// Executing (including retries)
    Running,
    /// Finished with a result
    Succeeded,
    /// Retries exhausted or non-retryable error
    Failed,
}

impl JobStatus {
    /// Whether the job reached an end state
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    /// Whether moving to `next` keeps the lifecycle forward-only
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Queued, Self::Running)
                | (Self::Running, Self::Succeeded | Self::Failed)
        )
    }

    /// Lowercase label
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entity: a background job record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Unique identity
    pub id: String,
    /// Kind of computation
    pub kind: JobKind,
    /// Logical key shared by jobs doing the same work
    pub key: String,
    /// Parameters
    pub payload: JobPayload,
    /// Lifecycle state
    pub status: JobStatus,
    /// Attempts started so far
    pub attempts: u32,
    /// Rendered last error
    pub last_error: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last state change
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Create a queued job with a fresh identity
    pub fn new(payload: JobPayload) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind: payload.kind(),
            key: payload.key(),
            payload,
            status: JobStatus::Queued,
            attempts: 0,
            last_error: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move to `next`, rejecting backward or skipping transitions
    pub fn transition(&mut self, next: JobStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(Error::internal(format!(
                "job {} cannot move from {} to {}",
                self.id, self.status, next
            )));
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Record the start of another attempt
    pub fn begin_attempt(&mut self) {
        self.attempts += 1;
        self.updated_at = Utc::now();
    }

    /// Record a failed attempt without leaving the running state
    pub fn record_error(&mut self, error: &Error) {
        self.last_error = Some(error.to_string());
        self.updated_at = Utc::now();
    }
}

/// Result of a succeeded job, shared with every coalesced waiter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobOutput {
    /// Embedding refreshed or reused
    Embedding {
        /// Owner
        user_id: String,
        /// Vector length
        dimensions: usize,
        /// True when an existing embedding was kept
        reused: bool,
    },
    /// Recomputed match list
    Matches {
        /// The list
        matches: Vec<Match>,
    },
    /// New cluster generation
    Clusters {
        /// The generation
        generation: ClusterGeneration,
    },
    /// Generated project ideas
    Projects {
        /// The ideas
        projects: Vec<ProjectIdea>,
    },
}
