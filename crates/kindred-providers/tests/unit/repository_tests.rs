//! Tests for the in-memory repositories

use chrono::Utc;

use kindred_domain::entities::{
    ClusterGeneration, Color, MatchInterest, MatchRecord, MatchStrategy, PersonalityProfile,
    ProjectIdea, UserEmbedding,
};
use kindred_domain::repositories::{
    ClusterRepository, EmbeddingRepository, MatchRepository, ProfileRepository,
    ProjectRepository,
};
use kindred_providers::repository::{
    MemoryClusterRepository, MemoryEmbeddingRepository, MemoryMatchRepository,
    MemoryProfileRepository, MemoryProjectRepository,
};

fn generation(id: &str) -> ClusterGeneration {
    ClusterGeneration {
        generation_id: id.to_string(),
        clusters: Vec::new(),
        k: 0,
        iterations: 0,
        converged: true,
        distortion: 0.0,
        elbow: Vec::new(),
        population: 0,
        created_at: Utc::now(),
    }
}

fn idea(user_id: &str, partner_id: &str, title: &str) -> ProjectIdea {
    ProjectIdea {
        project_id: title.to_string(),
        user_id: user_id.to_string(),
        partner_id: partner_id.to_string(),
        title: title.to_string(),
        description: String::new(),
        roles: Vec::new(),
        estimated_duration: "2-4 weeks".to_string(),
        difficulty: "beginner".to_string(),
        potential_impact: 5,
        feasibility: 0.9,
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_embeddings_are_listed_by_user_id_and_superseded_on_put() {
    let repo = MemoryEmbeddingRepository::new();
    repo.put(UserEmbedding::new("carol", vec![1.0], "m")).await.unwrap();
    repo.put(UserEmbedding::new("alice", vec![2.0], "m")).await.unwrap();
    repo.put(UserEmbedding::new("carol", vec![3.0], "m")).await.unwrap();

    let all = repo.list_all().await.unwrap();
    let ids: Vec<&str> = all.iter().map(|e| e.user_id.as_str()).collect();
    assert_eq!(ids, ["alice", "carol"]);
    assert_eq!(repo.get("carol").await.unwrap().unwrap().vector, vec![3.0]);
    assert_eq!(repo.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_cluster_generation_is_replaced_wholesale() {
    let repo = MemoryClusterRepository::new();
    assert!(repo.current().await.unwrap().is_none());

    repo.replace(generation("g1")).await.unwrap();
    let held = repo.current().await.unwrap().unwrap();
    repo.replace(generation("g2")).await.unwrap();

    assert_eq!(held.generation_id, "g1");
    assert_eq!(repo.current().await.unwrap().unwrap().generation_id, "g2");
}

#[tokio::test]
async fn test_profiles_round_trip() {
    let repo = MemoryProfileRepository::new();
    repo.put_personality(PersonalityProfile::new("u1", Color::Blue, ["Analytical"]))
        .await
        .unwrap();

    let profile = repo.personality("u1").await.unwrap().unwrap();
    assert!(profile.has_trait("analytical"));
    assert!(repo.document("u1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_interest_is_upserted_per_pair() {
    let repo = MemoryMatchRepository::new();
    for interested in [true, false] {
        repo.save_interest(MatchInterest {
            user_id: "u1".to_string(),
            target_id: "u2".to_string(),
            interested,
            updated_at: Utc::now(),
        })
        .await
        .unwrap();
    }

    let stored = repo.interest("u1", "u2").await.unwrap().unwrap();
    assert!(!stored.interested);
    assert!(repo.interest("u2", "u1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_match_records_are_appended_in_order() {
    let repo = MemoryMatchRepository::new();
    for id in ["r1", "r2"] {
        repo.save_record(MatchRecord {
            record_id: id.to_string(),
            user_id: "u1".to_string(),
            strategy: MatchStrategy::Complementary,
            limit: 10,
            matches: Vec::new(),
            created_at: Utc::now(),
        })
        .await
        .unwrap();
    }

    let records = repo.records_for("u1").await.unwrap();
    let ids: Vec<&str> = records.iter().map(|r| r.record_id.as_str()).collect();
    assert_eq!(ids, ["r1", "r2"]);
    assert!(repo.records_for("u2").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_projects_are_found_for_either_ordering_of_the_pair() {
    let repo = MemoryProjectRepository::new();
    repo.save_all(&[idea("a", "b", "one"), idea("b", "a", "two"), idea("a", "c", "three")])
        .await
        .unwrap();

    let found = repo.for_pair("a", "b").await.unwrap();
    let titles: Vec<&str> = found.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, ["one", "two"]);
}
