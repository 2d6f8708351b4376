//! Tests for the job orchestrator

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use kindred_application::jobs::{JobOrchestrator, JobPolicies, SHUTTING_DOWN};
use kindred_application::ports::services::JobExecutor;
use kindred_application::timeouts::IoTimeouts;
use kindred_domain::entities::{JobKind, JobOutput, JobPayload, JobStatus};
use kindred_domain::error::{Error, Result};
use kindred_domain::ports::CacheProvider;
use kindred_providers::cache::TtlMemoryCacheProvider;
use kindred_providers::repository::MemoryJobRepository;

use crate::support::new_cache;

/// Executor replaying scripted attempt results
#[derive(Default)]
struct ScriptedExecutor {
    script: Mutex<VecDeque<Result<JobOutput>>>,
    calls: AtomicUsize,
    seen: Mutex<Vec<JobPayload>>,
    delay: Duration,
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl ScriptedExecutor {
    fn with(results: Vec<Result<JobOutput>>) -> Self {
        Self {
            script: Mutex::new(results.into()),
            ..Self::default()
        }
    }

    fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn seen(&self) -> Vec<JobPayload> {
        self.seen.lock().unwrap().clone()
    }

    fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JobExecutor for ScriptedExecutor {
    async fn execute(&self, payload: &JobPayload) -> Result<JobOutput> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(payload.clone());
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(active, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.active.fetch_sub(1, Ordering::SeqCst);

        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(refreshed(false)))
    }
}

fn refreshed(reused: bool) -> JobOutput {
    JobOutput::Embedding {
        user_id: "u1".to_string(),
        dimensions: 2,
        reused,
    }
}

fn refresh_u1() -> JobPayload {
    JobPayload::EmbeddingRefresh {
        user_id: "u1".to_string(),
        force_refresh: false,
    }
}

fn forced_refresh_u1() -> JobPayload {
    JobPayload::EmbeddingRefresh {
        user_id: "u1".to_string(),
        force_refresh: true,
    }
}

fn transient() -> Error {
    Error::external_service("embedding", "503 service unavailable")
}

struct Fixture {
    executor: Arc<ScriptedExecutor>,
    jobs: Arc<MemoryJobRepository>,
    backend: Arc<TtlMemoryCacheProvider>,
    orchestrator: JobOrchestrator,
}

fn fixture(executor: ScriptedExecutor) -> Fixture {
    let executor = Arc::new(executor);
    let jobs = Arc::new(MemoryJobRepository::new());
    let (cache, backend) = new_cache();
    let orchestrator = JobOrchestrator::new(
        executor.clone(),
        jobs.clone(),
        cache,
        JobPolicies::default(),
        IoTimeouts::default(),
    );
    Fixture {
        executor,
        jobs,
        backend,
        orchestrator,
    }
}

#[tokio::test]
async fn test_duplicate_submissions_share_one_job() {
    let fixture = fixture(ScriptedExecutor::default());

    let first = fixture.orchestrator.submit(refresh_u1()).unwrap();
    let second = fixture.orchestrator.submit(refresh_u1()).unwrap();

    assert_eq!(first.id(), second.id());
    assert_eq!(first.key(), "embedding:u1");
    assert_eq!(first.kind(), JobKind::EmbeddingRefresh);
    assert_eq!(fixture.orchestrator.in_flight(), 1);

    let (a, b) = tokio::join!(first.wait(), second.wait());
    assert_eq!(a.unwrap(), b.unwrap());
    assert_eq!(fixture.executor.calls(), 1);
    assert_eq!(fixture.orchestrator.in_flight(), 0);
}

#[tokio::test]
async fn test_forced_refresh_absorbs_later_plain_refresh() {
    let fixture = fixture(ScriptedExecutor::default());

    let forced = fixture.orchestrator.submit(forced_refresh_u1()).unwrap();
    let plain = fixture.orchestrator.submit(refresh_u1()).unwrap();

    assert_eq!(forced.id(), plain.id());
    let (a, b) = tokio::join!(forced.wait(), plain.wait());
    assert_eq!(a.unwrap(), refreshed(false));
    assert_eq!(b.unwrap(), refreshed(false));
    assert_eq!(fixture.executor.seen(), vec![forced_refresh_u1()]);
}

#[tokio::test(start_paused = true)]
async fn test_forced_refresh_during_plain_refresh_runs_after_it() {
    let fixture = fixture(ScriptedExecutor::slow(Duration::from_millis(50)));

    let plain = fixture.orchestrator.submit(refresh_u1()).unwrap();
    let forced = fixture.orchestrator.submit(forced_refresh_u1()).unwrap();
    let plain_again = fixture.orchestrator.submit(refresh_u1()).unwrap();

    assert_ne!(plain.id(), forced.id());
    assert_eq!(forced.id(), plain_again.id());
    assert_eq!(plain.key(), forced.key());
    assert_eq!(fixture.orchestrator.in_flight(), 1);

    let (a, b) = tokio::join!(plain.wait(), forced.wait());
    a.unwrap();
    assert_eq!(b.unwrap(), refreshed(false));
    assert_eq!(
        fixture.executor.seen(),
        vec![refresh_u1(), forced_refresh_u1()]
    );
    assert_eq!(fixture.executor.peak(), 1);
    assert_eq!(fixture.orchestrator.in_flight(), 0);
}

#[tokio::test]
async fn test_finished_key_starts_a_fresh_job() {
    let fixture = fixture(ScriptedExecutor::default());

    let first = fixture.orchestrator.submit(refresh_u1()).unwrap();
    first.wait().await.unwrap();
    let second = fixture.orchestrator.submit(refresh_u1()).unwrap();
    second.wait().await.unwrap();

    assert_ne!(first.id(), second.id());
    assert_eq!(first.key(), second.key());
    assert_eq!(fixture.executor.calls(), 2);
}

#[tokio::test]
async fn test_different_keys_run_separately() {
    let fixture = fixture(ScriptedExecutor::default());

    let one = fixture.orchestrator.submit(refresh_u1()).unwrap();
    let other = fixture
        .orchestrator
        .submit(JobPayload::EmbeddingRefresh {
            user_id: "u2".to_string(),
            force_refresh: true,
        })
        .unwrap();

    assert_ne!(one.id(), other.id());
    one.wait().await.unwrap();
    other.wait().await.unwrap();
    assert_eq!(fixture.executor.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_transient_failures_are_retried_with_backoff() {
    let fixture = fixture(ScriptedExecutor::with(vec![
        Err(transient()),
        Err(transient()),
        Ok(refreshed(false)),
    ]));
    let started = tokio::time::Instant::now();

    let handle = fixture.orchestrator.submit(refresh_u1()).unwrap();
    let output = handle.wait().await.unwrap();

    assert_eq!(output, refreshed(false));
    assert_eq!(handle.attempts(), 3);
    assert_eq!(handle.status(), JobStatus::Succeeded);
    // 1 s after the first failure, 2 s after the second
    assert!(started.elapsed() >= Duration::from_secs(3));
}

#[tokio::test]
async fn test_non_retryable_failure_fails_on_first_attempt() {
    let fixture = fixture(ScriptedExecutor::with(vec![Err(Error::not_found(
        "profile document for user u1",
    ))]));

    let handle = fixture.orchestrator.submit(refresh_u1()).unwrap();
    let err = handle.wait().await.unwrap_err();

    match err {
        Error::JobTerminalFailure {
            job_id,
            kind,
            attempts,
            last_error,
            cause,
        } => {
            assert_eq!(job_id, handle.id());
            assert_eq!(kind, "embedding_refresh");
            assert_eq!(attempts, 1);
            assert!(last_error.contains("profile document"));
            assert!(matches!(cause.as_deref(), Some(Error::NotFound { .. })));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(fixture.executor.calls(), 1);
    assert_eq!(handle.status(), JobStatus::Failed);
}

#[tokio::test(start_paused = true)]
async fn test_retries_stop_at_the_attempt_budget() {
    let fixture = fixture(ScriptedExecutor::with(vec![
        Err(transient()),
        Err(transient()),
        Err(transient()),
        Ok(refreshed(false)),
    ]));

    let handle = fixture.orchestrator.submit(refresh_u1()).unwrap();
    let err = handle.wait().await.unwrap_err();

    assert!(matches!(err, Error::JobTerminalFailure { attempts: 3, .. }));
    assert_eq!(fixture.executor.calls(), 3);

    let record = fixture.orchestrator.job(handle.id()).await.unwrap().unwrap();
    assert_eq!(record.status, JobStatus::Failed);
    assert_eq!(record.attempts, 3);
    assert!(record.last_error.unwrap().contains("503"));
}

#[tokio::test]
async fn test_job_record_is_persisted() {
    let fixture = fixture(ScriptedExecutor::default());

    let handle = fixture.orchestrator.submit(refresh_u1()).unwrap();
    handle.wait().await.unwrap();

    let record = fixture.orchestrator.job(handle.id()).await.unwrap().unwrap();
    assert_eq!(record.status, JobStatus::Succeeded);
    assert_eq!(record.attempts, 1);
    assert_eq!(record.key, "embedding:u1");
    assert_eq!(fixture.jobs.len(), 1);
    assert!(fixture.orchestrator.job("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_shutdown_drains_and_rejects_new_jobs() {
    let fixture = fixture(ScriptedExecutor::default());
    let handle = fixture.orchestrator.submit(refresh_u1()).unwrap();

    fixture.orchestrator.shutdown().await;

    assert_eq!(handle.status(), JobStatus::Succeeded);
    assert!(fixture.orchestrator.is_shutting_down());
    let err = fixture.orchestrator.submit(refresh_u1()).unwrap_err();
    assert!(err.to_string().contains(SHUTTING_DOWN));
}

async fn seed_cache(backend: &TtlMemoryCacheProvider) {
    use kindred_domain::ports::CacheEntryConfig;
    for key in ["matches:u1:similar:10:x", "analysis:u1:u2", "clusters:u7", "matches:u2:a"] {
        backend
            .set_json(key, "[]", CacheEntryConfig::new())
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_successful_refresh_invalidates_dependent_entries() {
    let fixture = fixture(ScriptedExecutor::default());
    seed_cache(&fixture.backend).await;

    let handle = fixture.orchestrator.submit(refresh_u1()).unwrap();
    handle.wait().await.unwrap();

    assert!(!fixture.backend.exists("matches:u1:similar:10:x").await.unwrap());
    assert!(!fixture.backend.exists("analysis:u1:u2").await.unwrap());
    assert!(!fixture.backend.exists("clusters:u7").await.unwrap());
    assert!(fixture.backend.exists("matches:u2:a").await.unwrap());
}

#[tokio::test]
async fn test_reused_embedding_leaves_the_cache_alone() {
    let fixture = fixture(ScriptedExecutor::with(vec![Ok(refreshed(true))]));
    seed_cache(&fixture.backend).await;

    let handle = fixture.orchestrator.submit(refresh_u1()).unwrap();
    handle.wait().await.unwrap();

    assert!(fixture.backend.exists("matches:u1:similar:10:x").await.unwrap());
    assert!(fixture.backend.exists("clusters:u7").await.unwrap());
}

#[tokio::test]
async fn test_failed_job_keeps_cached_results() {
    let fixture = fixture(ScriptedExecutor::with(vec![Err(Error::invalid_argument(
        "nothing to embed",
    ))]));
    seed_cache(&fixture.backend).await;

    let handle = fixture.orchestrator.submit(refresh_u1()).unwrap();
    assert!(handle.wait().await.is_err());

    assert!(fixture.backend.exists("analysis:u1:u2").await.unwrap());
}
