//! Tests for the matching service

use std::sync::Arc;

use kindred_application::ports::services::MatchingServiceInterface;
use kindred_domain::entities::{
    Archetype, Color, Element, MatchFilters, MatchStrategy, MatchType,
};
use kindred_domain::error::Error;
use kindred_domain::repositories::MatchRepository;

use crate::support::{MatchingFixture, ScriptedNarrative, at_similarity, personality, summary};

async fn similar_population() -> MatchingFixture {
    let fixture = MatchingFixture::new();
    fixture.add_embedding("me", vec![1.0, 0.0]).await;
    fixture.add_embedding("a", at_similarity(0.95)).await;
    fixture.add_embedding("b", at_similarity(0.8)).await;
    fixture.add_embedding("c", at_similarity(0.3)).await;
    fixture
}

fn ids(matches: &[kindred_domain::entities::Match]) -> Vec<&str> {
    matches.iter().map(|m| m.target_id.as_str()).collect()
}

#[tokio::test]
async fn test_similar_matches_are_ranked_by_combined_score() {
    let fixture = similar_population().await;
    let service = fixture.service();

    let matches = service
        .find_matches("me", MatchStrategy::Similar, 10, &MatchFilters::none())
        .await
        .unwrap();

    assert_eq!(ids(&matches), ["a", "b"]);
    // 0.4 * similarity + 0.3 * 0.5 + 0.3 * 0.5
    assert!((matches[0].combined_score - 0.68).abs() < 1e-6);
    assert!((matches[1].combined_score - 0.62).abs() < 1e-6);
    assert!(matches.iter().all(|m| m.user_id == "me"));
}

#[tokio::test]
async fn test_requester_never_matches_themselves() {
    let fixture = similar_population().await;
    let service = fixture.service();

    for strategy in [
        MatchStrategy::Similar,
        MatchStrategy::Complementary,
        MatchStrategy::Balanced,
    ] {
        let matches = service
            .find_matches("me", strategy, 10, &MatchFilters::none())
            .await
            .unwrap();
        assert!(!ids(&matches).contains(&"me"));
    }
}

#[tokio::test]
async fn test_complementary_strategy_prefers_the_band() {
    let fixture = similar_population().await;
    let service = fixture.service();

    let matches = service
        .find_matches("me", MatchStrategy::Complementary, 10, &MatchFilters::none())
        .await
        .unwrap();

    assert_eq!(ids(&matches), ["c"]);
}

#[tokio::test]
async fn test_cached_list_is_served_until_invalidated() {
    let fixture = similar_population().await;
    let service = fixture.service();
    let filters = MatchFilters::none();

    let first = service
        .find_matches("me", MatchStrategy::Similar, 10, &filters)
        .await
        .unwrap();
    fixture.add_embedding("d", at_similarity(0.99)).await;
    let second = service
        .find_matches("me", MatchStrategy::Similar, 10, &filters)
        .await
        .unwrap();
    assert_eq!(first, second);

    fixture.cache.invalidate("matches:me:").await.unwrap();
    let third = service
        .find_matches("me", MatchStrategy::Similar, 10, &filters)
        .await
        .unwrap();
    assert_eq!(ids(&third), ["d", "a", "b"]);
}

#[tokio::test]
async fn test_limit_truncates_and_zero_is_rejected() {
    let fixture = similar_population().await;
    let service = fixture.service();

    let one = service
        .find_matches("me", MatchStrategy::Similar, 1, &MatchFilters::none())
        .await
        .unwrap();
    assert_eq!(ids(&one), ["a"]);

    let err = service
        .find_matches("me", MatchStrategy::Similar, 0, &MatchFilters::none())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
}

#[tokio::test]
async fn test_filters_narrow_the_list() {
    let fixture = similar_population().await;
    let service = fixture.service();

    let above = service
        .find_matches(
            "me",
            MatchStrategy::Similar,
            10,
            &MatchFilters::none().with_min_score(0.65),
        )
        .await
        .unwrap();
    assert_eq!(ids(&above), ["a"]);

    let only_b = service
        .find_matches(
            "me",
            MatchStrategy::Similar,
            10,
            &MatchFilters::none().for_target("b"),
        )
        .await
        .unwrap();
    assert_eq!(ids(&only_b), ["b"]);

    let astro = service
        .find_matches(
            "me",
            MatchStrategy::Similar,
            10,
            &MatchFilters::none().requiring_astro_data(),
        )
        .await
        .unwrap();
    assert!(astro.is_empty());
}

#[tokio::test]
async fn test_requester_without_embedding_gets_neutral_vector_scores() {
    let fixture = MatchingFixture::new();
    fixture.add_embedding("a", vec![1.0, 0.0]).await;
    fixture.add_embedding("b", vec![0.0, 1.0]).await;
    fixture
        .add_personality(personality("newcomer", Color::Green, &["curious"]))
        .await;
    let service = fixture.service();

    let matches = service
        .find_matches("newcomer", MatchStrategy::Similar, 10, &MatchFilters::none())
        .await
        .unwrap();

    assert_eq!(ids(&matches), ["a", "b"]);
    assert!(matches.iter().all(|m| m.vector_score == 0.5));
    assert!(matches.iter().all(|m| !m.breakdown.embedding_available));
}

#[tokio::test]
async fn test_symbolic_data_feeds_the_astro_score() {
    let fixture = similar_population().await;
    fixture
        .symbolic
        .put(summary("me", Element::Fire, Archetype::Pioneer));
    fixture
        .symbolic
        .put(summary("a", Element::Earth, Archetype::Guardian));
    let service = fixture.service();

    let matches = service
        .find_matches(
            "me",
            MatchStrategy::Similar,
            10,
            &MatchFilters::none().requiring_astro_data(),
        )
        .await
        .unwrap();

    assert_eq!(ids(&matches), ["a"]);
    // 0.3 * 0.8 + 0.4 * 0.5 + 0.3 * 0.8
    assert!((matches[0].astro_score - 0.68).abs() < 1e-9);
}

#[tokio::test]
async fn test_analysis_of_self_or_unknown_user_fails() {
    let fixture = similar_population().await;
    let service = fixture.service();

    assert!(matches!(
        service.analysis("me", "me").await,
        Err(Error::InvalidArgument { .. })
    ));
    assert!(matches!(
        service.analysis("me", "ghost").await,
        Err(Error::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_analysis_carries_percentages_and_narrative() {
    let fixture = similar_population().await;
    fixture
        .add_personality(personality("me", Color::Red, &["analytical"]))
        .await;
    fixture
        .add_personality(personality("a", Color::Yellow, &["creative"]))
        .await;
    let narrative = Arc::new(ScriptedNarrative::default());
    let service = fixture.service_with(narrative.clone());

    let analysis = service.analysis("me", "a").await.unwrap();

    assert_eq!(analysis.narrative.as_deref(), Some("me and a"));
    assert_eq!(analysis.complementary_pairs.len(), 1);
    assert_eq!(analysis.breakdown.values, 95);
    assert_eq!(analysis.breakdown.energy, 50);
    assert_eq!(analysis.match_result.target_id, "a");
    assert!(analysis.synergy_level <= 100);

    let again = service.analysis("me", "a").await.unwrap();
    assert_eq!(again, analysis);
    assert_eq!(narrative.calls(), 1);
}

#[tokio::test]
async fn test_failed_narrative_degrades_and_is_not_cached() {
    let fixture = similar_population().await;
    let narrative = Arc::new(ScriptedNarrative::failing());
    let service = fixture.service_with(narrative.clone());

    let first = service.analysis("me", "b").await.unwrap();
    assert_eq!(first.narrative, None);
    assert_eq!(first.match_result.match_type, MatchType::Good);

    service.analysis("me", "b").await.unwrap();
    assert_eq!(narrative.calls(), 2);
}

#[tokio::test]
async fn test_recalculate_caches_and_records_the_list() {
    let fixture = similar_population().await;
    let service = fixture.service();

    let matches = service
        .recalculate("me", MatchStrategy::Similar, 5)
        .await
        .unwrap();
    assert_eq!(ids(&matches), ["a", "b"]);

    let records = fixture.records.records_for("me").await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].matches, matches);
    assert_eq!(records[0].limit, 5);

    fixture.add_embedding("d", at_similarity(0.99)).await;
    let served = service
        .find_matches("me", MatchStrategy::Similar, 5, &MatchFilters::none())
        .await
        .unwrap();
    assert_eq!(served, matches);
}

#[tokio::test]
async fn test_interest_is_upserted() {
    let fixture = similar_population().await;
    let service = fixture.service();

    service.save_interest("me", "a", true).await.unwrap();
    service.save_interest("me", "a", false).await.unwrap();

    let stored = fixture.records.interest("me", "a").await.unwrap().unwrap();
    assert!(!stored.interested);
    assert!(matches!(
        service.save_interest("me", "me", true).await,
        Err(Error::InvalidArgument { .. })
    ));
}
