//! Collaborative project entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::analysis::ElementRelation;
use super::personality::TraitPair;
use crate::constants::FEASIBILITY_UNKNOWN;

/// What the narrative collaborator is told about a pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectContext {
    /// First partner
    pub user_id: String,
    /// Second partner
    pub partner_id: String,
    /// Traits both partners hold
    pub shared_traits: Vec<String>,
    /// Complementary pairs found across the partners
    pub complementary_pairs: Vec<TraitPair>,
    /// Element relation label
    pub element_relation: ElementRelation,
    /// Combined match score of the pair
    pub combined_score: f64,
    /// Number of ideas requested
    pub count: usize,
}

/// A project proposed for two partners
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectIdea {
    /// Identity of the idea
    pub project_id: String,
    /// First partner
    pub user_id: String,
    /// Second partner
    pub partner_id: String,
    /// Short title
    pub title: String,
    /// What the project is
    pub description: String,
    /// Suggested role per partner
    #[serde(default)]
    pub roles: Vec<String>,
    /// Duration label ("2-4 weeks", "1-2 months", ...)
    pub estimated_duration: String,
    /// Difficulty label ("beginner", "intermediate", "advanced")
    pub difficulty: String,
    /// Impact rating, 1-10
    pub potential_impact: u8,
    /// Mean of the difficulty and duration scores
    #[serde(default)]
    pub feasibility: f64,
    /// When the idea was generated
    pub created_at: DateTime<Utc>,
}

impl ProjectIdea {
    /// Difficulty contribution to feasibility
    pub fn difficulty_score(label: &str) -> f64 {
        match label.trim().to_ascii_lowercase().as_str() {
            "beginner" => 0.9,
            "intermediate" => 0.7,
            "advanced" => 0.5,
            _ => FEASIBILITY_UNKNOWN,
        }
    }

    /// Duration contribution to feasibility
    pub fn duration_score(label: &str) -> f64 {
        let normalized: String = label
            .to_ascii_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        match normalized.as_str() {
            "2-4weeks" => 0.9,
            "1-2months" => 0.7,
            "3-6months" => 0.5,
            "6+months" => 0.3,
            _ => FEASIBILITY_UNKNOWN,
        }
    }

    /// Feasibility of a difficulty / duration combination
    pub fn feasibility_of(difficulty: &str, duration: &str) -> f64 {
        (Self::difficulty_score(difficulty) + Self::duration_score(duration)) / 2.0
    }
}
