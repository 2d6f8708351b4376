//! Tests for the template narrative provider

use kindred_domain::entities::{
    ElementRelation, Match, MatchType, ProjectContext, ScoreBreakdown, TraitPair,
};
use kindred_domain::ports::NarrativeProvider;
use kindred_providers::narrative::TemplateNarrativeProvider;

fn scored(astro_available: bool) -> Match {
    Match {
        user_id: "ana".to_string(),
        target_id: "ben".to_string(),
        vector_score: 0.8,
        astro_score: 0.6,
        personality_score: 0.7,
        combined_score: 0.72,
        match_type: MatchType::Strong,
        breakdown: ScoreBreakdown {
            similarity: Some(0.8),
            element_compat: 0.6,
            aspect_harmony: 0.5,
            aspect_count: 0,
            archetype_compat: 0.6,
            color_compat: 0.7,
            trait_complementarity: 0.25,
            complementary_pairs: vec![TraitPair::new("analytical", "creative")],
            embedding_available: true,
            astro_available,
            personality_available: true,
        },
    }
}

fn context(count: usize) -> ProjectContext {
    ProjectContext {
        user_id: "ana".to_string(),
        partner_id: "ben".to_string(),
        shared_traits: vec!["curious".to_string()],
        complementary_pairs: vec![TraitPair::new("analytical", "creative")],
        element_relation: ElementRelation::Complementary,
        combined_score: 0.72,
        count,
    }
}

#[tokio::test]
async fn test_explanation_mentions_both_users_and_scores() {
    let provider = TemplateNarrativeProvider::new().unwrap();
    let text = provider.explain_match(&scored(true)).await.unwrap();

    assert!(text.contains("ana and ben"));
    assert!(text.contains("strong match"));
    assert!(text.contains("72%"));
    assert!(text.contains("analytical/creative"));
    assert!(!text.contains("No birth data"));
}

#[tokio::test]
async fn test_explanation_notes_missing_astro_data() {
    let provider = TemplateNarrativeProvider::new().unwrap();
    let text = provider.explain_match(&scored(false)).await.unwrap();

    assert!(text.contains("No birth data"));
}

#[tokio::test]
async fn test_proposes_the_requested_number_of_distinct_projects() {
    let provider = TemplateNarrativeProvider::new().unwrap();
    let projects = provider.propose_projects(&context(4)).await.unwrap();

    assert_eq!(projects.len(), 4);
    let mut titles: Vec<&str> = projects.iter().map(|p| p.title.as_str()).collect();
    titles.sort_unstable();
    titles.dedup();
    assert_eq!(titles.len(), 4);
    for project in &projects {
        assert_eq!(project.user_id, "ana");
        assert_eq!(project.partner_id, "ben");
        assert!(!project.description.contains("{{"));
        assert!((1..=10).contains(&project.potential_impact));
    }
}

#[tokio::test]
async fn test_project_count_is_capped_by_catalogue() {
    let provider = TemplateNarrativeProvider::new().unwrap();
    let projects = provider.propose_projects(&context(50)).await.unwrap();

    assert_eq!(projects.len(), TemplateNarrativeProvider::catalogue_size());
}

#[tokio::test]
async fn test_same_context_yields_same_projects() {
    let provider = TemplateNarrativeProvider::new().unwrap();
    let first = provider.propose_projects(&context(3)).await.unwrap();
    let second = provider.propose_projects(&context(3)).await.unwrap();

    let titles = |ideas: &[kindred_domain::entities::ProjectIdea]| {
        ideas.iter().map(|p| p.title.clone()).collect::<Vec<_>>()
    };
    assert_eq!(titles(&first), titles(&second));
}
