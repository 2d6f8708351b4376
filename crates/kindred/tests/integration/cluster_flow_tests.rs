//! Cluster recomputation and cross-cluster recommendations

use kindred::domain::repositories::ClusterRepository;
use kindred::Error;

use crate::support::{embedded_population, population};

#[tokio::test]
async fn test_recompute_partitions_the_population() {
    let population = embedded_population(12).await;

    let analysis = population.engine.recompute_clusters().await.unwrap();

    assert_eq!(analysis.population, 12);
    assert!(analysis.k >= 2);
    assert!(!analysis.clusters.is_empty());
    for user in &population.users {
        let homes = analysis
            .clusters
            .iter()
            .filter(|cluster| cluster.member_ids.contains(user))
            .count();
        assert_eq!(homes, 1, "{user} belongs to {homes} clusters");
    }

    let stored = population
        .repositories
        .clusters
        .current()
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.generation_id, analysis.generation_id);
}

#[tokio::test]
async fn test_similar_clusters_after_recompute() {
    let population = embedded_population(12).await;
    let analysis = population.engine.recompute_clusters().await.unwrap();

    let found = population
        .engine
        .find_similar_clusters("u05")
        .await
        .unwrap();

    let own = analysis.cluster_of("u05").unwrap().cluster_id;
    assert!(found.len() <= 3);
    for recommendation in &found {
        assert_eq!(recommendation.source_cluster_id, own);
        assert_ne!(recommendation.target_cluster_id, own);
        assert!(recommendation.representative_ids.len() <= 5);
    }
}

#[tokio::test]
async fn test_similar_clusters_before_any_generation_is_not_found() {
    let population = embedded_population(12).await;

    let err = population
        .engine
        .find_similar_clusters("u00")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NotFound { .. }));
}

#[tokio::test]
async fn test_recompute_with_small_population_reports_insufficient_data() {
    let population = embedded_population(9).await;

    let err = population.engine.recompute_clusters().await.unwrap_err();

    assert!(
        matches!(
            err,
            Error::InsufficientData {
                required: 10,
                available: 9
            }
        ),
        "unexpected error: {err:?}"
    );
    assert!(
        population
            .repositories
            .clusters
            .current()
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_clusters_require_embeddings() {
    let population = population(12).await;

    assert!(population.engine.recompute_clusters().await.is_err());
}
