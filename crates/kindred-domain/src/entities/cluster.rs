//! Cluster entities
//!
//! A clustering run produces a [`ClusterGeneration`]: an immutable snapshot
//! that replaces the previous generation wholesale. Cluster ids are only
//! meaningful inside their generation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One cohort of users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Index of the cluster inside its generation
    pub cluster_id: usize,
    /// Mean point of the members
    pub centroid: Vec<f32>,
    /// Members of the cluster
    pub member_ids: BTreeSet<String>,
    /// Members closest to the centroid, nearest first
    pub representative_ids: Vec<String>,
    /// Most frequent personality traits among members
    pub dominant_traits: Vec<String>,
}

impl Cluster {
    /// Number of members
    pub fn size(&self) -> usize {
        self.member_ids.len()
    }

    /// Whether `user_id` belongs to this cluster
    pub fn contains(&self, user_id: &str) -> bool {
        self.member_ids.contains(user_id)
    }
}

/// Distortion measured for one candidate k
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElbowPoint {
    /// Candidate cluster count
    pub k: usize,
    /// Sum of squared distances to the assigned centroids
    pub distortion: f64,
}

/// Entity: the result of one clustering run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterGeneration {
    /// Identity of this generation
    pub generation_id: String,
    /// Non-empty clusters, renumbered from zero
    pub clusters: Vec<Cluster>,
    /// Cluster count chosen by the elbow heuristic
    pub k: usize,
    /// Iterations used by the selected run
    pub iterations: usize,
    /// False when the selected run hit the iteration cap
    pub converged: bool,
    /// Distortion of the selected run
    pub distortion: f64,
    /// Distortion per evaluated k
    pub elbow: Vec<ElbowPoint>,
    /// Number of embeddings clustered
    pub population: usize,
    /// When the run finished
    pub created_at: DateTime<Utc>,
}

impl ClusterGeneration {
    /// Cluster holding `user_id`
    pub fn cluster_of(&self, user_id: &str) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.contains(user_id))
    }
}

/// Result of an explicit cluster recomputation
pub type ClusterAnalysis = ClusterGeneration;

/// A cross-cluster connection recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterMatch {
    /// The requesting user's cluster
    pub source_cluster_id: usize,
    /// The recommended cluster
    pub target_cluster_id: usize,
    /// Cosine similarity of the two centroids
    pub similarity: f64,
    /// Representatives of the recommended cluster
    pub representative_ids: Vec<String>,
    /// Dominant traits of the recommended cluster
    pub dominant_traits: Vec<String>,
    /// Size of the recommended cluster
    pub size: usize,
}
