//! Background jobs through the engine: coalescing, outputs, records and
//! shutdown

use std::io::Write;

use kindred::domain::repositories::{MatchRepository, ProjectRepository};
use kindred::{ConfigLoader, Engine, Error, JobKind, JobOutput, JobStatus, MatchStrategy};

use crate::support::{embedded_population, population};

#[tokio::test]
async fn test_duplicate_refresh_coalesces_onto_one_job() {
    let population = population(3).await;

    let first = population
        .engine
        .enqueue_embedding_refresh("u01", true)
        .unwrap();
    let second = population
        .engine
        .enqueue_embedding_refresh("u01", false)
        .unwrap();

    assert_eq!(first.id(), second.id());
    assert_eq!(first.kind(), JobKind::EmbeddingRefresh);
    let (a, b) = tokio::join!(first.wait(), second.wait());
    assert_eq!(a.unwrap(), b.unwrap());
}

#[tokio::test]
async fn test_forced_refresh_is_not_absorbed_by_plain_refresh() {
    let population = population(3).await;

    let plain = population
        .engine
        .enqueue_embedding_refresh("u01", false)
        .unwrap();
    let forced = population
        .engine
        .enqueue_embedding_refresh("u01", true)
        .unwrap();
    let again = population
        .engine
        .enqueue_embedding_refresh("u01", false)
        .unwrap();

    assert_ne!(plain.id(), forced.id());
    assert_eq!(forced.id(), again.id());
    plain.wait().await.unwrap();
    match forced.wait().await.unwrap() {
        JobOutput::Embedding { user_id, reused, .. } => {
            assert_eq!(user_id, "u01");
            assert!(!reused);
        }
        other => panic!("unexpected output: {other:?}"),
    }
}

#[tokio::test]
async fn test_embedding_refresh_output_and_record() {
    let population = population(2).await;

    let handle = population
        .engine
        .enqueue_embedding_refresh("u00", false)
        .unwrap();
    let output = handle.wait().await.unwrap();

    match &output {
        JobOutput::Embedding {
            user_id,
            dimensions,
            reused,
        } => {
            assert_eq!(user_id, "u00");
            assert_eq!(*dimensions, 16);
            assert!(!reused);
        }
        other => panic!("unexpected output: {other:?}"),
    }

    let record = population.engine.job(handle.id()).await.unwrap().unwrap();
    assert_eq!(record.status, JobStatus::Succeeded);
    assert_eq!(record.attempts, 1);
    assert!(record.last_error.is_none());

    let again = population
        .engine
        .enqueue_embedding_refresh("u00", false)
        .unwrap()
        .wait()
        .await
        .unwrap();
    assert!(matches!(
        &again,
        JobOutput::Embedding { reused: true, .. }
    ));
}

#[tokio::test]
async fn test_match_recalculation_records_an_audit_entry() {
    let population = embedded_population(12).await;

    let output = population
        .engine
        .enqueue_match_recalculation("u04", MatchStrategy::Similar, 3)
        .unwrap()
        .wait()
        .await
        .unwrap();

    let JobOutput::Matches { matches } = &output else {
        panic!("unexpected output: {output:?}");
    };
    assert!(matches.len() <= 3);

    let records = population
        .repositories
        .matches
        .records_for("u04")
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].strategy, MatchStrategy::Similar);
    assert_eq!(records[0].limit, 3);
    assert_eq!(&records[0].matches, matches);
}

#[tokio::test]
async fn test_match_recalculation_rejects_zero_limit() {
    let population = population(2).await;

    let err = population
        .engine
        .enqueue_match_recalculation("u00", MatchStrategy::Balanced, 0)
        .unwrap_err();

    assert!(matches!(err, Error::InvalidArgument { .. }));
    assert_eq!(population.engine.context().orchestrator().in_flight(), 0);
}

#[tokio::test]
async fn test_project_generation_persists_ideas() {
    let population = embedded_population(12).await;

    let output = population
        .engine
        .enqueue_project_generation("u00", "u01", 3)
        .unwrap()
        .wait()
        .await
        .unwrap();

    let JobOutput::Projects { projects } = &output else {
        panic!("unexpected output: {output:?}");
    };
    assert_eq!(projects.len(), 3);
    for idea in projects {
        assert_eq!(idea.user_id, "u00");
        assert_eq!(idea.partner_id, "u01");
        assert!((0.0..=1.0).contains(&idea.feasibility));
        assert!((1..=10).contains(&idea.potential_impact));
    }

    let stored = population
        .repositories
        .projects
        .for_pair("u00", "u01")
        .await
        .unwrap();
    assert_eq!(stored.len(), 3);
}

#[tokio::test]
async fn test_shutdown_rejects_new_jobs() {
    let population = population(2).await;

    population.engine.shutdown().await;

    assert!(population.engine.context().orchestrator().is_shutting_down());
    let err = population
        .engine
        .enqueue_embedding_refresh("u00", false)
        .unwrap_err();
    assert!(matches!(err, Error::Internal { .. }));
}

#[tokio::test]
async fn test_unknown_job_has_no_record() {
    let population = population(1).await;

    assert!(population.engine.job("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_engine_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[providers.embedding]\nprovider = \"null\"\ndimensions = 8\n\n[cache]\nprovider = \"moka\""
    )
    .unwrap();

    let engine = Engine::from_loader(
        &ConfigLoader::new()
            .with_config_path(file.path())
            .with_env_prefix("KINDRED_ENGINE_TEST"),
    )
    .unwrap();

    assert_eq!(engine.context().cache_provider().provider_name(), "moka");
    let output = engine
        .enqueue_embedding_refresh("solo", false)
        .unwrap()
        .wait()
        .await;
    // No profile document for "solo"
    assert!(output.is_err());
    let stats = engine.cache_stats().await.unwrap();
    assert_eq!(stats.entries, 0);
}
