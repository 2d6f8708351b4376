//! Embedding vector value object

use serde::{Deserialize, Serialize};

/// Value Object: vector returned by an embedding generator
///
/// ## Business Rules
///
/// - `vector.len()` equals `dimensions`
/// - Model name identifies the generation method; embeddings from different
///   models are never compared
///
/// ## Example
///
/// ```rust
/// use kindred_domain::value_objects::Embedding;
///
/// let embedding = Embedding {
///     vector: vec![0.1, 0.2, 0.3],
///     model: "text-embedding-3-small".to_string(),
///     dimensions: 3,
/// };
/// assert!(embedding.is_consistent());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Embedding {
    /// The embedding vector values
    pub vector: Vec<f32>,
    /// Name of the model that generated this embedding
    pub model: String,
    /// Dimensionality of the embedding vector
    pub dimensions: usize,
}

impl Embedding {
    /// Whether the vector length agrees with the declared dimension
    pub fn is_consistent(&self) -> bool {
        self.vector.len() == self.dimensions
    }
}
