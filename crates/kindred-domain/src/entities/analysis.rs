//! Detailed match analysis

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::matching::Match;
use super::personality::TraitPair;
use super::symbolic::{Aspect, AspectNature, Planet};

/// Reading of the aspects touching one planet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectDescription {
    /// More harmonic than challenging aspects
    Harmonious,
    /// More challenging than harmonic aspects
    Stimulating,
    /// As many of each
    Balanced,
    /// No aspect touches the planet
    Neutral,
}

impl AspectDescription {
    /// Describe the aspects in `aspects` that involve `planet`
    pub fn for_planet(aspects: &[Aspect], planet: Planet) -> Self {
        let touching: Vec<&Aspect> = aspects.iter().filter(|a| a.involves(planet)).collect();
        if touching.is_empty() {
            return Self::Neutral;
        }
        let harmonic = touching
            .iter()
            .filter(|a| a.nature() == AspectNature::Harmonic)
            .count();
        let challenging = touching
            .iter()
            .filter(|a| a.nature() == AspectNature::Challenging)
            .count();
        match harmonic.cmp(&challenging) {
            std::cmp::Ordering::Greater => Self::Harmonious,
            std::cmp::Ordering::Less => Self::Stimulating,
            std::cmp::Ordering::Equal => Self::Balanced,
        }
    }
}

/// Descriptive label of the element pairing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementRelation {
    /// Table value of at least 0.7
    VeryCompatible,
    /// Table value of at least 0.5
    Compatible,
    /// Anything lower
    Complementary,
}

impl ElementRelation {
    /// Label an element compatibility value
    pub fn from_compat(value: f64) -> Self {
        if value >= 0.7 {
            Self::VeryCompatible
        } else if value >= 0.5 {
            Self::Compatible
        } else {
            Self::Complementary
        }
    }
}

/// Component scores as rounded percentages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PercentageBreakdown {
    /// Vector (shared values) component
    pub values: u8,
    /// Astrological (energy) component
    pub energy: u8,
    /// Personality component
    pub personality: u8,
}

/// A match plus the labels and narrative shown on an analysis screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedAnalysis {
    /// The scored pairing
    #[serde(rename = "match")]
    pub match_result: Match,
    /// Combined score as a 0-100 level
    pub synergy_level: u8,
    /// Component percentages
    pub breakdown: PercentageBreakdown,
    /// Reading of the Sun's aspects
    pub sun: AspectDescription,
    /// Reading of the Moon's aspects
    pub moon: AspectDescription,
    /// Label of the element pairing
    pub element_relation: ElementRelation,
    /// Complementary trait pairs found across the two users
    pub complementary_pairs: Vec<TraitPair>,
    /// Generated explanation; absent when the narrative collaborator failed
    pub narrative: Option<String>,
    /// When the analysis was produced
    pub generated_at: DateTime<Utc>,
}

/// Convert a `[0, 1]` score into a rounded percentage
pub fn as_percentage(score: f64) -> u8 {
    // clamped to 0..=100 so the cast is lossless
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let pct = (score.clamp(0.0, 1.0) * 100.0).round() as u8;
    pct
}
