//! Scoring configuration
//!
//! Every weight and lookup table used by the compatibility scorer lives in
//! [`ScoringConfig`]. It is loaded once, validated, and shared read-only, so
//! re-weighting never touches the scoring algorithm.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::{ASPECT_ORB_DEGREES, NEUTRAL_SCORE, WEIGHT_SUM_TOLERANCE};
use crate::entities::{MatchType, Planet, TraitPair};
use crate::error::{Error, Result};

/// Symmetric lookup table keyed by lowercase category names
///
/// Missing pairs read as the neutral score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompatibilityTable(pub BTreeMap<String, BTreeMap<String, f64>>);

impl CompatibilityTable {
    /// Build a symmetric table from the upper triangle
    pub fn symmetric(entries: &[(&str, &str, f64)]) -> Self {
        let mut rows: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
        for (a, b, value) in entries {
            rows.entry((*a).to_string())
                .or_default()
                .insert((*b).to_string(), *value);
            rows.entry((*b).to_string())
                .or_default()
                .insert((*a).to_string(), *value);
        }
        Self(rows)
    }

    /// Value for `(a, b)`, if the table has it
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        self.0.get(a).and_then(|row| row.get(b)).copied()
    }

    /// Value for `(a, b)`, falling back to `neutral`
    pub fn lookup(&self, a: &str, b: &str, neutral: f64) -> f64 {
        self.get(a, b).unwrap_or(neutral)
    }

    /// Check every entry is in `[0, 1]` and the table is symmetric
    pub fn validate(&self, name: &str) -> Result<()> {
        for (a, row) in &self.0 {
            for (b, value) in row {
                if !(0.0..=1.0).contains(value) {
                    return Err(Error::configuration(format!(
                        "{name} table entry {a}/{b} = {value} is outside [0, 1]"
                    )));
                }
                match self.get(b, a) {
                    Some(mirror) if (mirror - value).abs() <= WEIGHT_SUM_TOLERANCE => {}
                    _ => {
                        return Err(Error::configuration(format!(
                            "{name} table is not symmetric at {a}/{b}"
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Fusion weights of the combined score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionWeights {
    /// Embedding similarity weight
    pub vector: f64,
    /// Astrological synergy weight
    pub astro: f64,
    /// Personality complementarity weight
    pub personality: f64,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            vector: 0.4,
            astro: 0.3,
            personality: 0.3,
        }
    }
}

/// Weights inside the astrological score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AstroWeights {
    /// Element table weight
    pub element: f64,
    /// Aspect harmony weight
    pub aspects: f64,
    /// Archetype table weight
    pub archetype: f64,
}

impl Default for AstroWeights {
    fn default() -> Self {
        Self {
            element: 0.3,
            aspects: 0.4,
            archetype: 0.3,
        }
    }
}

/// Weights inside the personality score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalityWeights {
    /// Colour table weight
    pub color: f64,
    /// Trait complementarity weight
    pub traits: f64,
}

impl Default for PersonalityWeights {
    fn default() -> Self {
        Self {
            color: 0.6,
            traits: 0.4,
        }
    }
}

/// Lower bounds of the match type bands
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchTypeLadder {
    /// Excellent from here
    pub excellent: f64,
    /// Strong from here
    pub strong: f64,
    /// Good from here
    pub good: f64,
    /// Moderate from here
    pub moderate: f64,
}

impl Default for MatchTypeLadder {
    fn default() -> Self {
        Self {
            excellent: 0.8,
            strong: 0.7,
            good: 0.6,
            moderate: 0.5,
        }
    }
}

impl MatchTypeLadder {
    /// Band of `score`
    pub fn classify(&self, score: f64) -> MatchType {
        if score >= self.excellent {
            MatchType::Excellent
        } else if score >= self.strong {
            MatchType::Strong
        } else if score >= self.good {
            MatchType::Good
        } else if score >= self.moderate {
            MatchType::Moderate
        } else {
            MatchType::Basic
        }
    }
}

/// Complete scoring configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Weights of the combined score
    pub fusion: FusionWeights,
    /// Weights of the astrological score
    pub astro: AstroWeights,
    /// Weights of the personality score
    pub personality: PersonalityWeights,
    /// Fallback for missing data
    pub neutral_score: f64,
    /// Match type thresholds
    pub ladder: MatchTypeLadder,
    /// Element compatibility
    pub elements: CompatibilityTable,
    /// Archetype compatibility
    pub archetypes: CompatibilityTable,
    /// Colour compatibility
    pub colors: CompatibilityTable,
    /// Complementary trait pairs
    pub complementary_pairs: Vec<TraitPair>,
    /// Planets whose aspects count towards harmony
    pub personal_planets: Vec<Planet>,
    /// Orb for cross-chart aspects, degrees
    pub aspect_orb: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            fusion: FusionWeights::default(),
            astro: AstroWeights::default(),
            personality: PersonalityWeights::default(),
            neutral_score: NEUTRAL_SCORE,
            ladder: MatchTypeLadder::default(),
            elements: CompatibilityTable::symmetric(&[
                ("fire", "fire", 0.6),
                ("fire", "earth", 0.8),
                ("fire", "air", 0.7),
                ("fire", "water", 0.4),
                ("earth", "earth", 0.5),
                ("earth", "air", 0.4),
                ("earth", "water", 0.7),
                ("air", "air", 0.6),
                ("air", "water", 0.8),
                ("water", "water", 0.5),
            ]),
            archetypes: CompatibilityTable::symmetric(&[
                ("pioneer", "pioneer", 0.6),
                ("pioneer", "guardian", 0.8),
                ("pioneer", "mystic", 0.7),
                ("pioneer", "scholar", 0.5),
                ("guardian", "guardian", 0.4),
                ("guardian", "mystic", 0.6),
                ("guardian", "scholar", 0.9),
                ("mystic", "mystic", 0.5),
                ("mystic", "scholar", 0.8),
                ("scholar", "scholar", 0.4),
            ]),
            colors: CompatibilityTable::symmetric(&[
                ("red", "red", 0.4),
                ("red", "blue", 0.8),
                ("red", "green", 0.6),
                ("red", "yellow", 0.7),
                ("blue", "blue", 0.3),
                ("blue", "green", 0.9),
                ("blue", "yellow", 0.5),
                ("green", "green", 0.5),
                ("green", "yellow", 0.8),
                ("yellow", "yellow", 0.4),
            ]),
            complementary_pairs: vec![
                TraitPair::new("analytical", "creative"),
                TraitPair::new("structured", "flexible"),
                TraitPair::new("assertive", "receptive"),
                TraitPair::new("detailed", "big_picture"),
                TraitPair::new("practical", "visionary"),
            ],
            personal_planets: Planet::PERSONAL.to_vec(),
            aspect_orb: ASPECT_ORB_DEGREES,
        }
    }
}

fn check_weight_group(name: &str, weights: &[f64]) -> Result<()> {
    if weights.iter().any(|w| !(0.0..=1.0).contains(w)) {
        return Err(Error::configuration(format!(
            "{name} weights must each be within [0, 1]"
        )));
    }
    let sum: f64 = weights.iter().sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(Error::configuration(format!(
            "{name} weights must sum to 1.0, got {sum}"
        )));
    }
    Ok(())
}

impl ScoringConfig {
    /// Validate weights, tables and ladder
    pub fn validate(&self) -> Result<()> {
        check_weight_group(
            "fusion",
            &[self.fusion.vector, self.fusion.astro, self.fusion.personality],
        )?;
        check_weight_group(
            "astro",
            &[self.astro.element, self.astro.aspects, self.astro.archetype],
        )?;
        check_weight_group(
            "personality",
            &[self.personality.color, self.personality.traits],
        )?;

        if !(0.0..=1.0).contains(&self.neutral_score) {
            return Err(Error::configuration("neutral_score must be within [0, 1]"));
        }

        let ladder = [
            self.ladder.excellent,
            self.ladder.strong,
            self.ladder.good,
            self.ladder.moderate,
        ];
        if ladder.windows(2).any(|w| w[0] <= w[1]) {
            return Err(Error::configuration(
                "match type ladder must be strictly descending",
            ));
        }

        self.elements.validate("element")?;
        self.archetypes.validate("archetype")?;
        self.colors.validate("colour")?;

        if self.complementary_pairs.is_empty() {
            return Err(Error::configuration(
                "at least one complementary trait pair is required",
            ));
        }
        if !(0.0..=30.0).contains(&self.aspect_orb) {
            return Err(Error::configuration("aspect_orb must be within [0, 30] degrees"));
        }
        Ok(())
    }
}
