//! Astrological symbolic summary
//!
//! The astrological calculator is an external collaborator; the engine only
//! consumes the small categorical snapshot defined here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Classical element of a chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    /// Fire
    Fire,
    /// Earth
    Earth,
    /// Air
    Air,
    /// Water
    Water,
}

impl Element {
    /// All elements in table order
    pub const ALL: [Self; 4] = [Self::Fire, Self::Earth, Self::Air, Self::Water];

    /// Lowercase key used by the scoring tables
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fire => "fire",
            Self::Earth => "earth",
            Self::Air => "air",
            Self::Water => "water",
        }
    }
}

/// Symbolic archetype derived from the chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Archetype {
    /// Initiator, drives things forward
    Pioneer,
    /// Stabiliser, protects what exists
    Guardian,
    /// Intuitive, looks for meaning
    Mystic,
    /// Analyst, looks for understanding
    Scholar,
}

impl Archetype {
    /// All archetypes in table order
    pub const ALL: [Self; 4] = [Self::Pioneer, Self::Guardian, Self::Mystic, Self::Scholar];

    /// Lowercase key used by the scoring tables
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pioneer => "pioneer",
            Self::Guardian => "guardian",
            Self::Mystic => "mystic",
            Self::Scholar => "scholar",
        }
    }
}

/// Celestial body tracked by the symbolic summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Planet {
    /// Sun
    Sun,
    /// Moon
    Moon,
    /// Mercury
    Mercury,
    /// Venus
    Venus,
    /// Mars
    Mars,
    /// Jupiter
    Jupiter,
    /// Saturn
    Saturn,
    /// Uranus
    Uranus,
    /// Neptune
    Neptune,
    /// Pluto
    Pluto,
}

impl Planet {
    /// Personal planets, the ones whose aspects count towards harmony
    pub const PERSONAL: [Self; 5] = [Self::Sun, Self::Moon, Self::Mercury, Self::Venus, Self::Mars];

    /// Lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sun => "sun",
            Self::Moon => "moon",
            Self::Mercury => "mercury",
            Self::Venus => "venus",
            Self::Mars => "mars",
            Self::Jupiter => "jupiter",
            Self::Saturn => "saturn",
            Self::Uranus => "uranus",
            Self::Neptune => "neptune",
            Self::Pluto => "pluto",
        }
    }
}

/// How an aspect is read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectNature {
    /// Flowing, supportive
    Harmonic,
    /// Tense, stimulating
    Challenging,
    /// Depends on the planets involved
    Neutral,
}

/// Major aspect kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectKind {
    /// 0 degrees
    Conjunction,
    /// 60 degrees
    Sextile,
    /// 90 degrees
    Square,
    /// 120 degrees
    Trine,
    /// 180 degrees
    Opposition,
}

impl AspectKind {
    /// All aspect kinds by ascending angle
    pub const ALL: [Self; 5] = [
        Self::Conjunction,
        Self::Sextile,
        Self::Square,
        Self::Trine,
        Self::Opposition,
    ];

    /// Exact angle of the aspect in degrees
    pub fn angle(self) -> f64 {
        match self {
            Self::Conjunction => 0.0,
            Self::Sextile => 60.0,
            Self::Square => 90.0,
            Self::Trine => 120.0,
            Self::Opposition => 180.0,
        }
    }

    /// Harmonic / challenging / neutral reading
    pub fn nature(self) -> AspectNature {
        match self {
            Self::Sextile | Self::Trine => AspectNature::Harmonic,
            Self::Square | Self::Opposition => AspectNature::Challenging,
            Self::Conjunction => AspectNature::Neutral,
        }
    }

    /// Find the aspect formed by two ecliptic longitudes, if any is within `orb`.
    ///
    /// Returns the aspect whose exact angle is closest to the separation,
    /// together with the remaining orb.
    pub fn between(longitude_a: f64, longitude_b: f64, orb: f64) -> Option<(Self, f64)> {
        let mut separation = (longitude_a - longitude_b).abs() % 360.0;
        if separation > 180.0 {
            separation = 360.0 - separation;
        }
        Self::ALL
            .iter()
            .map(|kind| (*kind, (separation - kind.angle()).abs()))
            .filter(|(_, deviation)| *deviation <= orb)
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

/// An aspect between two planets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aspect {
    /// First planet
    pub planet_a: Planet,
    /// Second planet
    pub planet_b: Planet,
    /// Aspect kind
    pub kind: AspectKind,
    /// Deviation from the exact angle, in degrees
    #[serde(default)]
    pub orb: f64,
}

impl Aspect {
    /// Reading of the aspect
    pub fn nature(&self) -> AspectNature {
        self.kind.nature()
    }

    /// Whether the aspect involves `planet`
    pub fn involves(&self, planet: Planet) -> bool {
        self.planet_a == planet || self.planet_b == planet
    }
}

/// Ecliptic position of a planet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// The planet
    pub planet: Planet,
    /// Ecliptic longitude in degrees, `[0, 360)`
    pub longitude: f64,
}

/// Entity: read-only astrological snapshot for one user
///
/// Sourced from the astrological calculator and cached with a long TTL,
/// since it changes only when birth data changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolicSummary {
    /// Owner of the summary
    pub user_id: String,
    /// Dominant element of the chart
    pub dominant_element: Element,
    /// Symbolic archetype
    pub archetype: Archetype,
    /// The user's natal aspects
    #[serde(default)]
    pub aspects: Vec<Aspect>,
    /// Planet positions; enables cross-chart aspects when present for both users
    #[serde(default)]
    pub placements: Vec<Placement>,
}

impl SymbolicSummary {
    /// Longitude of `planet`, if placed
    pub fn longitude_of(&self, planet: Planet) -> Option<f64> {
        self.placements
            .iter()
            .find(|p| p.planet == planet)
            .map(|p| p.longitude)
    }
}

macro_rules! impl_label {
    ($ty:ty, $what:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_ascii_lowercase();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == wanted)
                    .ok_or_else(|| Error::invalid_argument(format!("unknown {}: {s}", $what)))
            }
        }
    };
}

impl Planet {
    /// Every tracked body
    pub const ALL: [Self; 10] = [
        Self::Sun,
        Self::Moon,
        Self::Mercury,
        Self::Venus,
        Self::Mars,
        Self::Jupiter,
        Self::Saturn,
        Self::Uranus,
        Self::Neptune,
        Self::Pluto,
    ];
}

impl_label!(Element, "element");
impl_label!(Archetype, "archetype");
impl_label!(Planet, "planet");
