//! Compatibility scorer
//!
//! Fuses three sub-scores into one bounded score:
//!
//! ```text
//! vector      = cosine(embedding_a, embedding_b), clamped to [0, 1]
//! astro       = w_element * element + w_aspects * harmony + w_archetype * archetype
//! personality = w_color * colour + w_traits * complementarity
//! combined    = clamp(w_v * vector + w_a * astro + w_p * personality, 0, 1)
//! ```
//!
//! Any missing data source scores the configured neutral value instead of
//! failing: one absent summary must not block a whole match list.

use std::sync::Arc;

use kindred_domain::entities::{
    Aspect, AspectKind, AspectNature, Match, PersonalityProfile, ScoreBreakdown, SymbolicSummary,
    TraitPair, UserEmbedding,
};
use kindred_domain::error::Result;
use kindred_domain::value_objects::ScoringConfig;

use super::vector_math::cosine_similarity;

/// Everything known about one side of a pairing
#[derive(Debug, Clone, Default)]
pub struct PartyProfile {
    /// The user
    pub user_id: String,
    /// Current embedding
    pub embedding: Option<UserEmbedding>,
    /// Astrological snapshot
    pub symbolic: Option<SymbolicSummary>,
    /// Personality snapshot
    pub personality: Option<PersonalityProfile>,
}

impl PartyProfile {
    /// A party with no data yet
    pub fn new<S: Into<String>>(user_id: S) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    /// Whether no data source knows this user
    pub fn is_unknown(&self) -> bool {
        self.embedding.is_none() && self.symbolic.is_none() && self.personality.is_none()
    }
}

struct AstroParts {
    score: f64,
    element: f64,
    harmony: f64,
    aspect_count: usize,
    archetype: f64,
}

struct PersonalityParts {
    score: f64,
    color: f64,
    complementarity: f64,
    pairs: Vec<TraitPair>,
}

/// Deterministic multi-factor scorer
#[derive(Debug, Clone)]
pub struct CompatibilityScorer {
    config: Arc<ScoringConfig>,
}

impl CompatibilityScorer {
    /// Create a scorer over validated configuration
    pub fn new(config: Arc<ScoringConfig>) -> Self {
        Self { config }
    }

    /// Configuration in use
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score `b` as a match for `a`.
    ///
    /// Fails only when both embeddings exist with different dimensions.
    pub fn score(&self, a: &PartyProfile, b: &PartyProfile) -> Result<Match> {
        let cfg = &*self.config;

        let similarity = match (&a.embedding, &b.embedding) {
            (Some(ea), Some(eb)) => Some(cosine_similarity(&ea.vector, &eb.vector)?),
            _ => None,
        };
        let vector_score = similarity.map_or(cfg.neutral_score, |s| s.clamp(0.0, 1.0));

        let astro = match (&a.symbolic, &b.symbolic) {
            (Some(sa), Some(sb)) => Some(self.astro_parts(sa, sb)),
            _ => None,
        };
        let personality = match (&a.personality, &b.personality) {
            (Some(pa), Some(pb)) => Some(self.personality_parts(pa, pb)),
            _ => None,
        };

        let astro_score = astro.as_ref().map_or(cfg.neutral_score, |p| p.score);
        let personality_score = personality.as_ref().map_or(cfg.neutral_score, |p| p.score);
        let combined_score = (cfg.fusion.vector * vector_score
            + cfg.fusion.astro * astro_score
            + cfg.fusion.personality * personality_score)
            .clamp(0.0, 1.0);

        let breakdown = ScoreBreakdown {
            similarity,
            element_compat: astro.as_ref().map_or(cfg.neutral_score, |p| p.element),
            aspect_harmony: astro.as_ref().map_or(cfg.neutral_score, |p| p.harmony),
            aspect_count: astro.as_ref().map_or(0, |p| p.aspect_count),
            archetype_compat: astro.as_ref().map_or(cfg.neutral_score, |p| p.archetype),
            color_compat: personality.as_ref().map_or(cfg.neutral_score, |p| p.color),
            trait_complementarity: personality
                .as_ref()
                .map_or(cfg.neutral_score, |p| p.complementarity),
            complementary_pairs: personality.map(|p| p.pairs).unwrap_or_default(),
            embedding_available: similarity.is_some(),
            astro_available: astro.is_some(),
            personality_available: a.personality.is_some() && b.personality.is_some(),
        };

        Ok(Match {
            user_id: a.user_id.clone(),
            target_id: b.user_id.clone(),
            vector_score,
            astro_score,
            personality_score,
            combined_score,
            match_type: cfg.ladder.classify(combined_score),
            breakdown,
        })
    }

    fn astro_parts(&self, a: &SymbolicSummary, b: &SymbolicSummary) -> AstroParts {
        let cfg = &*self.config;
        let element = cfg.elements.lookup(
            a.dominant_element.as_str(),
            b.dominant_element.as_str(),
            cfg.neutral_score,
        );
        let archetype =
            cfg.archetypes
                .lookup(a.archetype.as_str(), b.archetype.as_str(), cfg.neutral_score);

        let aspects = self.pair_aspects(a, b);
        let harmonic = aspects
            .iter()
            .filter(|x| x.nature() == AspectNature::Harmonic)
            .count();
        let harmony = if aspects.is_empty() {
            cfg.neutral_score
        } else {
            harmonic as f64 / aspects.len() as f64
        };

        let score = (cfg.astro.element * element
            + cfg.astro.aspects * harmony
            + cfg.astro.archetype * archetype)
            .clamp(0.0, 1.0);
        AstroParts {
            score,
            element,
            harmony,
            aspect_count: aspects.len(),
            archetype,
        }
    }

    /// Personal-planet aspects relevant to a pairing.
    ///
    /// Cross-chart aspects when both users have placements for personal
    /// planets, otherwise each user's own aspects between personal planets.
    pub fn pair_aspects(&self, a: &SymbolicSummary, b: &SymbolicSummary) -> Vec<Aspect> {
        let cfg = &*self.config;
        let personal = &cfg.personal_planets;
        let has_placements = |s: &SymbolicSummary| {
            personal.iter().any(|planet| s.longitude_of(*planet).is_some())
        };

        if has_placements(a) && has_placements(b) {
            let mut aspects = Vec::new();
            for planet_a in personal {
                let Some(longitude_a) = a.longitude_of(*planet_a) else {
                    continue;
                };
                for planet_b in personal {
                    let Some(longitude_b) = b.longitude_of(*planet_b) else {
                        continue;
                    };
                    if let Some((kind, orb)) =
                        AspectKind::between(longitude_a, longitude_b, cfg.aspect_orb)
                    {
                        aspects.push(Aspect {
                            planet_a: *planet_a,
                            planet_b: *planet_b,
                            kind,
                            orb,
                        });
                    }
                }
            }
            return aspects;
        }

        a.aspects
            .iter()
            .chain(&b.aspects)
            .filter(|x| personal.contains(&x.planet_a) && personal.contains(&x.planet_b))
            .cloned()
            .collect()
    }

    fn personality_parts(&self, a: &PersonalityProfile, b: &PersonalityProfile) -> PersonalityParts {
        let cfg = &*self.config;
        let color = cfg.colors.lookup(
            a.dominant_color.as_str(),
            b.dominant_color.as_str(),
            cfg.neutral_score,
        );
        let pairs = self.complementary_pairs(a, b);
        let complementarity = if cfg.complementary_pairs.is_empty() {
            0.0
        } else {
            pairs.len() as f64 / cfg.complementary_pairs.len() as f64
        };
        let score = (cfg.personality.color * color + cfg.personality.traits * complementarity)
            .clamp(0.0, 1.0);
        PersonalityParts {
            score,
            color,
            complementarity,
            pairs,
        }
    }

    /// Configured complementary pairs present across the two users
    pub fn complementary_pairs(&self, a: &PersonalityProfile, b: &PersonalityProfile) -> Vec<TraitPair> {
        self.config
            .complementary_pairs
            .iter()
            .filter(|pair| pair.present_across(a, b))
            .cloned()
            .collect()
    }
}
