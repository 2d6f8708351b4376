//! Tests for the similarity index

use kindred_application::domain_services::SimilarityIndex;
use kindred_domain::entities::MatchStrategy;
use kindred_domain::error::Error;
use kindred_domain::value_objects::SimilarityConfig;

use crate::support::{at_similarity, embedding};

const QUERY: [f32; 2] = [1.0, 0.0];

fn index() -> SimilarityIndex {
    SimilarityIndex::new(SimilarityConfig {
        threshold: 0.7,
        band_min: 0.1,
        band_max: 0.5,
        pool_multiplier: 3,
    })
}

fn candidates(similarities: &[f32]) -> Vec<kindred_domain::entities::UserEmbedding> {
    similarities
        .iter()
        .enumerate()
        .map(|(i, s)| embedding(&format!("u{i}"), at_similarity(*s)))
        .collect()
}

#[test]
fn test_complementary_keeps_only_the_band() {
    let ranked = index()
        .top_k(
            &QUERY,
            &candidates(&[0.05, 0.2, 0.45, 0.6, 0.9]),
            10,
            MatchStrategy::Complementary,
        )
        .unwrap();

    let ids: Vec<&str> = ranked.iter().map(|r| r.user_id.as_str()).collect();
    // 0.2 sits closer to the band centre (0.3) than 0.45
    assert_eq!(ids, ["u1", "u2"]);
    assert!((ranked[0].similarity - 0.2).abs() < 1e-6);
    assert!((ranked[1].similarity - 0.45).abs() < 1e-6);
}

#[test]
fn test_similar_keeps_candidates_above_threshold_descending() {
    let ranked = index()
        .top_k(
            &QUERY,
            &candidates(&[0.75, 0.2, 0.95, 0.69]),
            10,
            MatchStrategy::Similar,
        )
        .unwrap();

    let ids: Vec<&str> = ranked.iter().map(|r| r.user_id.as_str()).collect();
    assert_eq!(ids, ["u2", "u0"]);
}

#[test]
fn test_balanced_requires_common_ground() {
    let ranked = index()
        .top_k(
            &QUERY,
            &candidates(&[0.05, 0.3, 0.9]),
            10,
            MatchStrategy::Balanced,
        )
        .unwrap();

    let ids: Vec<&str> = ranked.iter().map(|r| r.user_id.as_str()).collect();
    // 0.3: (0.3 + 1.0) / 2 = 0.65, 0.9: (0.9 + 0.0) / 2 = 0.45
    assert_eq!(ids, ["u1", "u2"]);
}

#[test]
fn test_ties_are_broken_by_user_id() {
    let pool = vec![
        embedding("zed", at_similarity(0.8)),
        embedding("amy", at_similarity(0.8)),
        embedding("kim", at_similarity(0.8)),
    ];
    let ranked = index()
        .top_k(&QUERY, &pool, 2, MatchStrategy::Similar)
        .unwrap();

    let ids: Vec<&str> = ranked.iter().map(|r| r.user_id.as_str()).collect();
    assert_eq!(ids, ["amy", "kim"]);
}

#[test]
fn test_fewer_qualifying_candidates_than_k_is_fine() {
    let ranked = index()
        .top_k(&QUERY, &candidates(&[0.9]), 5, MatchStrategy::Similar)
        .unwrap();
    assert_eq!(ranked.len(), 1);
}

#[test]
fn test_candidate_with_other_dimension_fails() {
    let pool = vec![embedding("odd", vec![1.0, 0.0, 0.0])];
    let err = index()
        .top_k(&QUERY, &pool, 5, MatchStrategy::Similar)
        .unwrap_err();
    assert!(matches!(err, Error::DimensionMismatch { .. }));
}

#[test]
fn test_complementarity_peaks_at_band_centre() {
    let index = index();
    assert!((index.complementarity(0.3) - 1.0).abs() < 1e-12);
    assert!((index.complementarity(0.2) - 0.5).abs() < 1e-9);
    assert_eq!(index.complementarity(0.9), 0.0);
}
