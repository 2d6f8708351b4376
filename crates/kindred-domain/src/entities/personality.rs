//! Personality snapshot and the structured profile document

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::symbolic::{Archetype, Element};
use crate::error::Error;

/// Dominant personality colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// Driven, decisive
    Red,
    /// Precise, analytical
    Blue,
    /// Supportive, steady
    Green,
    /// Expressive, social
    Yellow,
}

impl Color {
    /// All colours in table order
    pub const ALL: [Self; 4] = [Self::Red, Self::Blue, Self::Green, Self::Yellow];

    /// Lowercase key used by the scoring tables
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Yellow => "yellow",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| Error::invalid_argument(format!("unknown colour: {s}")))
    }
}

/// Entity: read-only personality snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalityProfile {
    /// Owner of the profile
    pub user_id: String,
    /// Dominant colour
    pub dominant_color: Color,
    /// Normalised (lowercase) trait names
    #[serde(default)]
    pub traits: BTreeSet<String>,
}

impl PersonalityProfile {
    /// Build a profile, normalising trait names to lowercase
    pub fn new<U, I, T>(user_id: U, dominant_color: Color, traits: I) -> Self
    where
        U: Into<String>,
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        Self {
            user_id: user_id.into(),
            dominant_color,
            traits: traits
                .into_iter()
                .map(|t| t.as_ref().trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    /// Whether the user carries `name`
    pub fn has_trait(&self, name: &str) -> bool {
        self.traits.contains(name)
    }
}

/// Two traits that complete each other (e.g. analytical / creative)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TraitPair {
    /// One side of the pair
    pub left: String,
    /// The complementary side
    pub right: String,
}

impl TraitPair {
    /// Create a pair
    pub fn new<L: Into<String>, R: Into<String>>(left: L, right: R) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }

    /// Whether one user holds one side and the other holds the opposite side
    pub fn present_across(&self, a: &PersonalityProfile, b: &PersonalityProfile) -> bool {
        (a.has_trait(&self.left) && b.has_trait(&self.right))
            || (a.has_trait(&self.right) && b.has_trait(&self.left))
    }
}

impl fmt::Display for TraitPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.left, self.right)
    }
}

/// Structured profile text the embedding generator consumes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDocument {
    /// Owner of the document
    pub user_id: String,
    /// Display name
    #[serde(default)]
    pub display_name: Option<String>,
    /// Free-text biography
    #[serde(default)]
    pub bio: Option<String>,
    /// Dominant element, when the astrological profile is known
    #[serde(default)]
    pub element: Option<Element>,
    /// Archetype, when the astrological profile is known
    #[serde(default)]
    pub archetype: Option<Archetype>,
    /// Dominant personality colour
    #[serde(default)]
    pub color: Option<Color>,
    /// Personality traits
    #[serde(default)]
    pub traits: Vec<String>,
    /// Stated values
    #[serde(default)]
    pub values: Vec<String>,
    /// Interests
    #[serde(default)]
    pub interests: Vec<String>,
    /// Skills
    #[serde(default)]
    pub skills: Vec<String>,
    /// Goals
    #[serde(default)]
    pub goals: Vec<String>,
}

impl ProfileDocument {
    /// Render the document as the text handed to the embedding generator.
    ///
    /// Sections are emitted in a fixed order and empty sections are skipped,
    /// so identical documents always embed identical text.
    pub fn to_embedding_text(&self) -> String {
        let mut sections: Vec<String> = Vec::new();
        if let Some(name) = self.display_name.as_deref().filter(|s| !s.trim().is_empty()) {
            sections.push(format!("Name: {}", name.trim()));
        }
        if let Some(bio) = self.bio.as_deref().filter(|s| !s.trim().is_empty()) {
            sections.push(format!("Bio: {}", bio.trim()));
        }
        if let Some(element) = self.element {
            sections.push(format!("Element: {element}"));
        }
        if let Some(archetype) = self.archetype {
            sections.push(format!("Archetype: {archetype}"));
        }
        if let Some(color) = self.color {
            sections.push(format!("Color: {color}"));
        }
        for (label, items) in [
            ("Traits", &self.traits),
            ("Values", &self.values),
            ("Interests", &self.interests),
            ("Skills", &self.skills),
            ("Goals", &self.goals),
        ] {
            if !items.is_empty() {
                sections.push(format!("{label}: {}", items.join(", ")));
            }
        }
        sections.join("\n")
    }

    /// Whether there is nothing to embed
    pub fn is_blank(&self) -> bool {
        self.to_embedding_text().trim().is_empty()
    }
}
