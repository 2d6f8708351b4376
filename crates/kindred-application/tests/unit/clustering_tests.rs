//! Tests for the clustering engine

use std::collections::{BTreeSet, HashMap};

use chrono::Utc;
use kindred_application::domain_services::{ClusteringEngine, select_k};
use kindred_domain::entities::{Cluster, ClusterGeneration, ElbowPoint, UserEmbedding};
use kindred_domain::error::Error;
use kindred_domain::value_objects::ClusteringConfig;

use crate::support::embedding;

fn engine(seed: u64) -> ClusteringEngine {
    ClusteringEngine::new(ClusteringConfig::default().with_seed(seed))
}

/// Two well separated groups of six users each
fn two_groups() -> Vec<UserEmbedding> {
    let mut population = Vec::new();
    for i in 0..6 {
        let jitter = i as f32 * 0.01;
        population.push(embedding(&format!("a{i}"), vec![1.0 + jitter, 0.0, jitter]));
        population.push(embedding(&format!("b{i}"), vec![0.0, 1.0 + jitter, jitter]));
    }
    population
}

fn no_traits() -> HashMap<String, BTreeSet<String>> {
    HashMap::new()
}

fn elbow(points: &[(usize, f64)]) -> Vec<ElbowPoint> {
    points
        .iter()
        .map(|(k, distortion)| ElbowPoint {
            k: *k,
            distortion: *distortion,
        })
        .collect()
}

#[test]
fn test_population_below_minimum_is_rejected() {
    let population: Vec<UserEmbedding> = (0..9)
        .map(|i| embedding(&format!("u{i}"), vec![i as f32, 1.0]))
        .collect();

    let err = engine(1).cluster(&population, &no_traits()).unwrap_err();
    assert!(matches!(
        err,
        Error::InsufficientData {
            required: 10,
            available: 9
        }
    ));
}

#[test]
fn test_identical_points_form_a_single_cluster() {
    let point = vec![0.3_f32, 0.7, 0.1];
    let population: Vec<UserEmbedding> = (0..10)
        .map(|i| embedding(&format!("u{i}"), point.clone()))
        .collect();

    let generation = engine(3).cluster(&population, &no_traits()).unwrap();

    assert_eq!(generation.clusters.len(), 1);
    let cluster = &generation.clusters[0];
    assert_eq!(cluster.cluster_id, 0);
    assert_eq!(cluster.size(), 10);
    assert_eq!(cluster.centroid, point);
    assert_eq!(generation.population, 10);
}

#[test]
fn test_every_user_lands_in_exactly_one_cluster() {
    let population = two_groups();
    let generation = engine(11).cluster(&population, &no_traits()).unwrap();

    let total: usize = generation.clusters.iter().map(Cluster::size).sum();
    assert_eq!(total, population.len());
    for user in &population {
        let owners = generation
            .clusters
            .iter()
            .filter(|c| c.contains(&user.user_id))
            .count();
        assert_eq!(owners, 1, "{} should belong to one cluster", user.user_id);
    }
    for (index, cluster) in generation.clusters.iter().enumerate() {
        assert_eq!(cluster.cluster_id, index);
        assert!(cluster.size() > 0);
        assert!(cluster.representative_ids.len() <= 5);
        assert!(
            cluster
                .representative_ids
                .iter()
                .all(|id| cluster.member_ids.contains(id))
        );
    }
}

#[test]
fn test_same_seed_gives_the_same_partition() {
    let population = two_groups();
    let first = engine(42).cluster(&population, &no_traits()).unwrap();
    let second = engine(42).cluster(&population, &no_traits()).unwrap();

    assert_eq!(first.clusters, second.clusters);
    assert_eq!(first.k, second.k);
    assert_ne!(first.generation_id, second.generation_id);
}

#[test]
fn test_dominant_traits_are_ranked_by_frequency() {
    let population = two_groups();
    let mut traits = HashMap::new();
    for user in &population {
        let mut set = BTreeSet::from(["curious".to_string()]);
        if user.user_id.starts_with('a') {
            set.insert("analytical".to_string());
        }
        traits.insert(user.user_id.clone(), set);
    }

    let generation = engine(5).cluster(&population, &traits).unwrap();
    let everyone = generation
        .clusters
        .iter()
        .all(|c| c.dominant_traits.first().map(String::as_str) == Some("curious"));
    assert!(everyone);
}

#[test]
fn test_kmeans_validates_k() {
    let points = vec![vec![0.0_f32, 1.0], vec![1.0, 0.0]];
    let engine = engine(0);

    assert!(matches!(
        engine.kmeans(&points, 0, 1),
        Err(Error::InvalidArgument { .. })
    ));
    assert!(matches!(
        engine.kmeans(&points, 3, 1),
        Err(Error::InvalidArgument { .. })
    ));
    let none: Vec<Vec<f32>> = Vec::new();
    assert!(matches!(
        engine.kmeans(&none, 1, 1),
        Err(Error::EmptyInput { .. })
    ));
}

#[test]
fn test_kmeans_with_one_centroid_per_point_has_no_distortion() {
    let points = vec![vec![0.0_f32, 1.0], vec![1.0, 0.0], vec![5.0, 5.0]];
    let run = engine(0).kmeans(&points, 3, 9).unwrap();

    assert!(run.converged);
    assert_eq!(run.distortion, 0.0);
    let distinct: BTreeSet<usize> = run.assignments.iter().copied().collect();
    assert_eq!(distinct.len(), 3);
}

#[test]
fn test_select_k_picks_the_point_after_the_sharpest_bend() {
    let curve = elbow(&[(2, 100.0), (3, 40.0), (4, 35.0), (5, 33.0)]);
    assert_eq!(select_k(&curve), 3);
}

#[test]
fn test_select_k_falls_back_to_smallest_k() {
    assert_eq!(select_k(&[]), 2);
    assert_eq!(select_k(&elbow(&[(2, 5.0)])), 2);
    assert_eq!(select_k(&elbow(&[(2, 10.0), (3, 10.0), (4, 10.0)])), 2);
    assert_eq!(select_k(&elbow(&[(2, 10.0), (3, 4.0)])), 3);
}

fn cluster(id: usize, centroid: Vec<f32>, members: &[&str]) -> Cluster {
    Cluster {
        cluster_id: id,
        centroid,
        member_ids: members.iter().map(|m| (*m).to_string()).collect(),
        representative_ids: members.iter().map(|m| (*m).to_string()).collect(),
        dominant_traits: Vec::new(),
    }
}

fn generation(clusters: Vec<Cluster>) -> ClusterGeneration {
    ClusterGeneration {
        generation_id: "g1".to_string(),
        population: clusters.iter().map(Cluster::size).sum(),
        clusters,
        k: 3,
        iterations: 1,
        converged: true,
        distortion: 0.0,
        elbow: Vec::new(),
        created_at: Utc::now(),
    }
}

#[test]
fn test_similar_clusters_skip_own_and_distant_clusters() {
    let generation = generation(vec![
        cluster(0, vec![1.0, 0.0], &["me", "peer"]),
        cluster(1, vec![0.9, 0.1], &["near"]),
        cluster(2, vec![0.0, 1.0], &["far"]),
        cluster(3, vec![0.8, 0.3], &["close", "closer"]),
    ]);

    let matches = engine(0).similar_clusters(&generation, "me").unwrap();

    let targets: Vec<usize> = matches.iter().map(|m| m.target_cluster_id).collect();
    assert_eq!(targets, [1, 3]);
    assert!(matches.iter().all(|m| m.source_cluster_id == 0));
    assert_eq!(matches[1].size, 2);
    assert!(matches[0].similarity > matches[1].similarity);
}

#[test]
fn test_similar_clusters_for_unclustered_user_is_not_found() {
    let generation = generation(vec![cluster(0, vec![1.0, 0.0], &["me"])]);
    assert!(matches!(
        engine(0).similar_clusters(&generation, "ghost"),
        Err(Error::NotFound { .. })
    ));
}
