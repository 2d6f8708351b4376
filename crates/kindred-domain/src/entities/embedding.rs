//! User embedding entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Entity: a user's profile embedding
///
/// Owned by the embedding store and superseded (never mutated) when the
/// user's profile text changes. Every vector compared in one computation
/// must share the same dimension.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserEmbedding {
    /// Owner of the embedding
    pub user_id: String,
    /// The embedding vector values
    pub vector: Vec<f32>,
    /// Name of the model that generated the vector
    pub model: String,
    /// Free-form provenance metadata (source text hash, provider, ...)
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    /// When this generation of the embedding was produced
    pub updated_at: DateTime<Utc>,
}

impl UserEmbedding {
    /// Create an embedding stamped with the current time
    pub fn new<U: Into<String>, M: Into<String>>(user_id: U, vector: Vec<f32>, model: M) -> Self {
        Self {
            user_id: user_id.into(),
            vector,
            model: model.into(),
            metadata: BTreeMap::new(),
            updated_at: Utc::now(),
        }
    }

    /// Attach a metadata entry
    #[must_use]
    pub fn with_metadata<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Dimensionality of the vector
    pub fn dimensions(&self) -> usize {
        self.vector.len()
    }
}
