//! Job Orchestrator
//!
//! Runs background jobs with a bounded worker pool per kind, bounded
//! retries and coalescing of duplicate requests.
//!
//! ## Lifecycle
//!
//! ```text
//! submit ──> queued ──(permit of the kind)──> running ──┬──> succeeded
//!                                                ^      │
//!                                                └retry─┴──> failed
//! ```
//!
//! - Each kind owns a [`Semaphore`] sized by its policy, so a backlog of
//!   one kind never starves another.
//! - Jobs are keyed by [`JobPayload::key`]. A submission whose key is in
//!   flight attaches to the latest job of that key when that job
//!   [covers](JobPayload::covers) it, and observes the same terminal result.
//!   Otherwise one follow-up job is queued behind it; the follow-up starts
//!   only after its predecessor ends, so at most one job per key runs.
//! - Only retryable errors are retried; the rest fail on the first attempt.
//! - On success the cache prefixes affected by the job are invalidated as
//!   part of the attempt, so a cache outage is retried like any other
//!   transient failure.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::{Semaphore, watch};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

use kindred_domain::entities::{Job, JobKind, JobOutput, JobPayload, JobStatus};
use kindred_domain::error::{Error, Result};
use kindred_domain::repositories::JobRepository;

use super::retry::JobPolicies;
use crate::ports::services::JobExecutor;
use crate::timeouts::{IoTimeouts, bounded};
use crate::use_cases::MatchCache;

/// Message of submissions rejected after shutdown began
pub const SHUTTING_DOWN: &str = "orchestrator is shutting down";

#[derive(Debug, Clone)]
enum JobOutcome {
    Succeeded(Arc<JobOutput>),
    Failed { attempts: u32, cause: Arc<Error> },
}

#[derive(Debug, Clone)]
struct JobState {
    status: JobStatus,
    attempts: u32,
    outcome: Option<JobOutcome>,
}

impl JobState {
    fn queued() -> Self {
        Self {
            status: JobStatus::Queued,
            attempts: 0,
            outcome: None,
        }
    }
}

/// Caller's view of a submitted job
///
/// Every handle of the same job, including those returned to coalesced
/// submissions, observes the same state and the same terminal result.
#[derive(Debug, Clone)]
pub struct JobHandle {
    id: String,
    key: String,
    kind: JobKind,
    state: watch::Receiver<JobState>,
}

impl JobHandle {
    /// Job id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Logical key used for coalescing
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Job kind
    pub fn kind(&self) -> JobKind {
        self.kind
    }

    /// Current status
    pub fn status(&self) -> JobStatus {
        self.state.borrow().status
    }

    /// Attempts started so far
    pub fn attempts(&self) -> u32 {
        self.state.borrow().attempts
    }

    /// Wait for the terminal result.
    ///
    /// A failed job yields [`Error::JobTerminalFailure`] whose source is the
    /// last attempt's error.
    pub async fn wait(&self) -> Result<JobOutput> {
        let mut state = self.state.clone();
        let outcome = state
            .wait_for(|s| s.outcome.is_some())
            .await
            .map_err(|_| Error::internal(format!("job {} ended without a result", self.id)))?
            .outcome
            .clone();
        match outcome {
            Some(JobOutcome::Succeeded(output)) => Ok(output.as_ref().clone()),
            Some(JobOutcome::Failed { attempts, cause }) => Err(Error::JobTerminalFailure {
                job_id: self.id.clone(),
                kind: self.kind.to_string(),
                attempts,
                last_error: cause.to_string(),
                cause: Some(cause),
            }),
            None => Err(Error::internal(format!("job {} has no outcome", self.id))),
        }
    }
}

/// One worker pool per kind
struct KindPermits {
    embedding_refresh: Arc<Semaphore>,
    match_recalculation: Arc<Semaphore>,
    cluster_recomputation: Arc<Semaphore>,
    project_generation: Arc<Semaphore>,
}

impl KindPermits {
    fn new(policies: &JobPolicies) -> Self {
        let pool = |kind: JobKind| Arc::new(Semaphore::new(policies.for_kind(kind).concurrency.max(1)));
        Self {
            embedding_refresh: pool(JobKind::EmbeddingRefresh),
            match_recalculation: pool(JobKind::MatchRecalculation),
            cluster_recomputation: pool(JobKind::ClusterRecomputation),
            project_generation: pool(JobKind::ProjectGeneration),
        }
    }

    fn of(&self, kind: JobKind) -> &Arc<Semaphore> {
        match kind {
            JobKind::EmbeddingRefresh => &self.embedding_refresh,
            JobKind::MatchRecalculation => &self.match_recalculation,
            JobKind::ClusterRecomputation => &self.cluster_recomputation,
            JobKind::ProjectGeneration => &self.project_generation,
        }
    }
}

/// Latest job submitted under a key
struct InFlight {
    payload: JobPayload,
    handle: JobHandle,
}

struct Inner {
    executor: Arc<dyn JobExecutor>,
    jobs: Arc<dyn JobRepository>,
    cache: MatchCache,
    policies: JobPolicies,
    permits: KindPermits,
    in_flight: DashMap<String, InFlight>,
    tracker: TaskTracker,
    shutdown: CancellationToken,
    timeouts: IoTimeouts,
}

/// Background job scheduler
#[derive(Clone)]
pub struct JobOrchestrator {
    inner: Arc<Inner>,
}

impl JobOrchestrator {
    /// Create an orchestrator; `policies` must be valid
    pub fn new(
        executor: Arc<dyn JobExecutor>,
        jobs: Arc<dyn JobRepository>,
        cache: MatchCache,
        policies: JobPolicies,
        timeouts: IoTimeouts,
    ) -> Self {
        let permits = KindPermits::new(&policies);
        Self {
            inner: Arc::new(Inner {
                executor,
                jobs,
                cache,
                policies,
                permits,
                in_flight: DashMap::new(),
                tracker: TaskTracker::new(),
                shutdown: CancellationToken::new(),
                timeouts,
            }),
        }
    }

    /// Policies in use
    pub fn policies(&self) -> &JobPolicies {
        &self.inner.policies
    }

    /// Submit a job, or attach to the in-flight job with the same key.
    ///
    /// A request the in-flight job does not cover, such as a forced
    /// embedding refresh arriving during a plain one, gets its own job that
    /// runs after the current one.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn submit(&self, payload: JobPayload) -> Result<JobHandle> {
        if self.inner.shutdown.is_cancelled() {
            return Err(Error::internal(SHUTTING_DOWN));
        }

        let (job, sender, handle, previous) = match self.inner.in_flight.entry(payload.key()) {
            Entry::Occupied(mut entry) => {
                let latest = entry.get();
                if latest.payload.covers(&payload) {
                    let handle = latest.handle.clone();
                    debug!(job_id = %handle.id, key = %handle.key, "coalesced onto in-flight job");
                    return Ok(handle);
                }
                let previous = latest.handle.state.clone();
                debug!(
                    after = %latest.handle.id,
                    key = %latest.handle.key,
                    "in-flight job does not cover request, chaining follow-up"
                );
                let (job, sender, handle) = queued(payload);
                entry.insert(InFlight {
                    payload: job.payload.clone(),
                    handle: handle.clone(),
                });
                (job, sender, handle, Some(previous))
            }
            Entry::Vacant(entry) => {
                let (job, sender, handle) = queued(payload);
                entry.insert(InFlight {
                    payload: job.payload.clone(),
                    handle: handle.clone(),
                });
                (job, sender, handle, None)
            }
        };

        info!(job_id = %job.id, kind = %job.kind, key = %job.key, "job queued");
        let inner = Arc::clone(&self.inner);
        self.inner
            .tracker
            .spawn(async move { inner.run(job, sender, previous).await });
        Ok(handle)
    }

    /// Persisted record of `job_id`
    pub async fn job(&self, job_id: &str) -> Result<Option<Job>> {
        bounded(
            "job lookup",
            self.inner.timeouts.persistence,
            self.inner.jobs.get(job_id),
        )
        .await
    }

    /// Keys currently queued or running
    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.len()
    }

    /// Whether shutdown has begun
    pub fn is_shutting_down(&self) -> bool {
        self.inner.shutdown.is_cancelled()
    }

    /// Stop accepting jobs and wait for the in-flight ones to finish
    pub async fn shutdown(&self) {
        self.inner.shutdown.cancel();
        self.inner.tracker.close();
        info!(in_flight = self.in_flight(), "job orchestrator draining");
        self.inner.tracker.wait().await;
        info!("job orchestrator stopped");
    }
}

impl Inner {
    async fn run(
        self: Arc<Self>,
        mut job: Job,
        state: watch::Sender<JobState>,
        previous: Option<watch::Receiver<JobState>>,
    ) {
        self.persist(&job).await;
        if let Some(mut previous) = previous {
            // A dropped sender also means the predecessor is gone
            let _ = previous.wait_for(|s| s.outcome.is_some()).await;
        }
        let policy = *self.policies.for_kind(job.kind);

        let permit = Arc::clone(self.permits.of(job.kind)).acquire_owned().await;
        advance(&mut job, JobStatus::Running);
        let Ok(_permit) = permit else {
            let failure = Error::internal(format!("worker pool of {} is closed", job.kind));
            job.record_error(&failure);
            self.finish(job, &state, Err(failure)).await;
            return;
        };
        state.send_modify(|s| s.status = JobStatus::Running);

        let outcome = loop {
            job.begin_attempt();
            self.persist(&job).await;
            state.send_modify(|s| s.attempts = job.attempts);
            debug!(job_id = %job.id, kind = %job.kind, attempt = job.attempts, "job attempt started");

            match self.attempt(&job.payload).await {
                Ok(output) => break Ok(output),
                Err(e) => {
                    job.record_error(&e);
                    if !policy.retry.should_retry(job.attempts, &e) {
                        break Err(e);
                    }
                    let delay = policy.retry.backoff.delay_after(job.attempts);
                    warn!(
                        job_id = %job.id,
                        kind = %job.kind,
                        attempt = job.attempts,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %e,
                        "job attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        };

        self.finish(job, &state, outcome).await;
    }

    /// One attempt: compute, then drop the cache entries the result supersedes
    async fn attempt(&self, payload: &JobPayload) -> Result<JobOutput> {
        let output = self.executor.execute(payload).await?;
        if matches!(output, JobOutput::Embedding { reused: true, .. }) {
            return Ok(output);
        }
        for prefix in MatchCache::invalidation_prefixes(payload) {
            self.cache.invalidate(&prefix).await?;
        }
        Ok(output)
    }

    async fn finish(&self, mut job: Job, state: &watch::Sender<JobState>, outcome: Result<JobOutput>) {
        let outcome = match outcome {
            Ok(output) => {
                advance(&mut job, JobStatus::Succeeded);
                info!(job_id = %job.id, kind = %job.kind, attempts = job.attempts, "job succeeded");
                JobOutcome::Succeeded(Arc::new(output))
            }
            Err(e) => {
                advance(&mut job, JobStatus::Failed);
                error!(
                    job_id = %job.id,
                    kind = %job.kind,
                    attempts = job.attempts,
                    error = %e,
                    "job failed"
                );
                JobOutcome::Failed {
                    attempts: job.attempts,
                    cause: Arc::new(e),
                }
            }
        };
        self.persist(&job).await;

        self.in_flight
            .remove_if(&job.key, |_, latest| latest.handle.id == job.id);
        state.send_replace(JobState {
            status: job.status,
            attempts: job.attempts,
            outcome: Some(outcome),
        });
    }

    /// Best-effort write of the job record
    async fn persist(&self, job: &Job) {
        if let Err(e) = bounded(
            "job record write",
            self.timeouts.persistence,
            self.jobs.save(job),
        )
        .await
        {
            warn!(job_id = %job.id, status = %job.status, error = %e, "job record not saved");
        }
    }
}

fn queued(payload: JobPayload) -> (Job, watch::Sender<JobState>, JobHandle) {
    let job = Job::new(payload);
    let (sender, receiver) = watch::channel(JobState::queued());
    let handle = JobHandle {
        id: job.id.clone(),
        key: job.key.clone(),
        kind: job.kind,
        state: receiver,
    };
    (job, sender, handle)
}

fn advance(job: &mut Job, next: JobStatus) {
    if let Err(e) = job.transition(next) {
        error!(job_id = %job.id, error = %e, "invalid job transition");
    }
}
