//! Clustering engine
//!
//! Partitions the embedding population into cohorts with k-means and picks
//! k with an elbow heuristic.
//!
//! # Rules
//!
//! - Initial centroids are sampled uniformly without replacement from the
//!   points, using a ChaCha8 generator seeded per candidate k.
//! - Each point joins the nearest centroid (Euclidean); ties go to the
//!   lowest centroid index.
//! - A centroid with no members keeps its previous position.
//! - A run stops when no centroid moves more than the tolerance, or at the
//!   iteration cap. Hitting the cap is reported through
//!   `converged == false`, never as an error.
//! - k ranges over `2..=min(max_k, n / 2)`; the chosen k is the one right
//!   after the largest second difference of distortion.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::Utc;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use kindred_domain::entities::{
    Cluster, ClusterGeneration, ClusterMatch, ElbowPoint, UserEmbedding,
};
use kindred_domain::error::{Error, Result};
use kindred_domain::value_objects::ClusteringConfig;

use super::vector_math::{centroid, cosine_similarity, euclidean_distance, squared_distance};

/// Outcome of a single k-means run
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansRun {
    /// Final centroid positions, indexed by cluster
    pub centroids: Vec<Vec<f32>>,
    /// Cluster index of every point
    pub assignments: Vec<usize>,
    /// Update iterations performed
    pub iterations: usize,
    /// Whether the movement fell below the tolerance before the cap
    pub converged: bool,
    /// Sum of squared distances to the assigned centroids
    pub distortion: f64,
}

/// k-means clustering with automatic k selection
#[derive(Debug, Clone, Default)]
pub struct ClusteringEngine {
    config: ClusteringConfig,
}

impl ClusteringEngine {
    /// Create an engine with the given parameters
    pub fn new(config: ClusteringConfig) -> Self {
        Self { config }
    }

    /// Parameters in use
    pub fn config(&self) -> &ClusteringConfig {
        &self.config
    }

    /// Run k-means with a fixed `k` and sampler `seed`
    pub fn kmeans<V: AsRef<[f32]>>(&self, points: &[V], k: usize, seed: u64) -> Result<KMeansRun> {
        if points.is_empty() {
            return Err(Error::empty_input("k-means over an empty point set"));
        }
        if k == 0 || k > points.len() {
            return Err(Error::invalid_argument(format!(
                "k must be within 1..={}, got {k}",
                points.len()
            )));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut centroids: Vec<Vec<f32>> = rand::seq::index::sample(&mut rng, points.len(), k)
            .iter()
            .map(|i| points[i].as_ref().to_vec())
            .collect();
        let mut assignments = vec![0usize; points.len()];
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.config.max_iterations {
            iterations += 1;
            assign(points, &centroids, &mut assignments)?;
            let updated = update(points, &assignments, &centroids)?;

            let mut max_movement = 0.0_f64;
            for (old, new) in centroids.iter().zip(&updated) {
                max_movement = max_movement.max(euclidean_distance(old, new)?);
            }
            centroids = updated;

            if max_movement < self.config.tolerance {
                converged = true;
                break;
            }
        }

        let distortion = assign(points, &centroids, &mut assignments)?;
        Ok(KMeansRun {
            centroids,
            assignments,
            iterations,
            converged,
            distortion,
        })
    }

    /// Cluster the population into a new generation.
    ///
    /// `traits` maps user ids to their personality traits; users missing
    /// from it simply contribute no traits.
    pub fn cluster(
        &self,
        embeddings: &[UserEmbedding],
        traits: &HashMap<String, BTreeSet<String>>,
    ) -> Result<ClusterGeneration> {
        let population = embeddings.len();
        if population < self.config.min_population {
            return Err(Error::insufficient_data(
                self.config.min_population,
                population,
            ));
        }
        let dimension = embeddings[0].vector.len();
        if let Some(odd) = embeddings.iter().find(|e| e.vector.len() != dimension) {
            return Err(Error::dimension_mismatch(dimension, odd.vector.len()));
        }

        let vectors: Vec<&[f32]> = embeddings.iter().map(|e| e.vector.as_slice()).collect();
        let max_k = self.config.max_k.min(population / 2).max(2);
        let base_seed = self.config.seed.unwrap_or_else(rand::random);

        let mut runs = Vec::with_capacity(max_k - 1);
        let mut elbow = Vec::with_capacity(max_k - 1);
        for k in 2..=max_k {
            let run = self.kmeans(&vectors, k, derive_seed(base_seed, k))?;
            debug!(
                k,
                distortion = run.distortion,
                iterations = run.iterations,
                "k-means run finished"
            );
            elbow.push(ElbowPoint {
                k,
                distortion: run.distortion,
            });
            runs.push(run);
        }

        let k = select_k(&elbow);
        let run = runs.swap_remove(k - 2);
        if !run.converged {
            warn!(
                k,
                iterations = run.iterations,
                "k-means reached the iteration cap without converging"
            );
        }

        let clusters = self.build_clusters(embeddings, &run, traits)?;
        Ok(ClusterGeneration {
            generation_id: uuid::Uuid::new_v4().to_string(),
            clusters,
            k,
            iterations: run.iterations,
            converged: run.converged,
            distortion: run.distortion,
            elbow,
            population,
            created_at: Utc::now(),
        })
    }

    fn build_clusters(
        &self,
        embeddings: &[UserEmbedding],
        run: &KMeansRun,
        traits: &HashMap<String, BTreeSet<String>>,
    ) -> Result<Vec<Cluster>> {
        let representative_count = self.config.representative_count();
        let mut clusters = Vec::new();

        for (index, center) in run.centroids.iter().enumerate() {
            let members: Vec<&UserEmbedding> = embeddings
                .iter()
                .zip(&run.assignments)
                .filter(|(_, assigned)| **assigned == index)
                .map(|(embedding, _)| embedding)
                .collect();
            if members.is_empty() {
                continue;
            }

            let mut by_distance = Vec::with_capacity(members.len());
            for member in &members {
                by_distance.push((squared_distance(center, &member.vector)?, &member.user_id));
            }
            by_distance.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(b.1)));

            clusters.push(Cluster {
                cluster_id: clusters.len(),
                centroid: center.clone(),
                member_ids: members.iter().map(|m| m.user_id.clone()).collect(),
                representative_ids: by_distance
                    .into_iter()
                    .take(representative_count)
                    .map(|(_, id)| id.clone())
                    .collect(),
                dominant_traits: self.dominant_traits(&members, traits),
            });
        }
        Ok(clusters)
    }

    fn dominant_traits(
        &self,
        members: &[&UserEmbedding],
        traits: &HashMap<String, BTreeSet<String>>,
    ) -> Vec<String> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for member in members {
            if let Some(member_traits) = traits.get(&member.user_id) {
                for name in member_traits {
                    *counts.entry(name.as_str()).or_default() += 1;
                }
            }
        }
        let mut ordered: Vec<(&str, usize)> = counts.into_iter().collect();
        ordered.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ordered
            .into_iter()
            .take(self.config.dominant_traits)
            .map(|(name, _)| name.to_string())
            .collect()
    }

    /// Clusters whose centroid resembles the centroid of `user_id`'s cluster.
    ///
    /// Keeps clusters above the similarity floor, most similar first, at
    /// most `max_cluster_matches`.
    pub fn similar_clusters(
        &self,
        generation: &ClusterGeneration,
        user_id: &str,
    ) -> Result<Vec<ClusterMatch>> {
        let source = generation
            .cluster_of(user_id)
            .ok_or_else(|| Error::not_found(format!("cluster for user {user_id}")))?;

        let mut matches = Vec::new();
        for other in &generation.clusters {
            if other.cluster_id == source.cluster_id {
                continue;
            }
            let similarity = cosine_similarity(&source.centroid, &other.centroid)?;
            if similarity > self.config.similarity_floor {
                matches.push(ClusterMatch {
                    source_cluster_id: source.cluster_id,
                    target_cluster_id: other.cluster_id,
                    similarity,
                    representative_ids: other.representative_ids.clone(),
                    dominant_traits: other.dominant_traits.clone(),
                    size: other.size(),
                });
            }
        }
        matches.sort_by(|a, b| {
            b.similarity
                .total_cmp(&a.similarity)
                .then_with(|| a.target_cluster_id.cmp(&b.target_cluster_id))
        });
        matches.truncate(self.config.max_cluster_matches);
        Ok(matches)
    }
}

/// Assign every point to its nearest centroid; returns the distortion
fn assign<V: AsRef<[f32]>>(
    points: &[V],
    centroids: &[Vec<f32>],
    assignments: &mut [usize],
) -> Result<f64> {
    let mut distortion = 0.0;
    for (point, slot) in points.iter().zip(assignments.iter_mut()) {
        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        for (index, center) in centroids.iter().enumerate() {
            let distance = squared_distance(point.as_ref(), center)?;
            if distance < best_distance {
                best = index;
                best_distance = distance;
            }
        }
        *slot = best;
        distortion += best_distance;
    }
    Ok(distortion)
}

/// New centroid positions; empty clusters keep their previous position
fn update<V: AsRef<[f32]>>(
    points: &[V],
    assignments: &[usize],
    previous: &[Vec<f32>],
) -> Result<Vec<Vec<f32>>> {
    let mut members: Vec<Vec<&[f32]>> = vec![Vec::new(); previous.len()];
    for (point, assigned) in points.iter().zip(assignments) {
        members[*assigned].push(point.as_ref());
    }
    members
        .iter()
        .zip(previous)
        .map(|(group, old)| {
            if group.is_empty() {
                Ok(old.clone())
            } else {
                centroid(group)
            }
        })
        .collect()
}

fn derive_seed(base: u64, k: usize) -> u64 {
    base.wrapping_add((k as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Pick k from the distortion curve.
///
/// With first differences `D[i] = d[i] - d[i+1]` and second differences
/// `S[i] = D[i] - D[i+1]`, the elbow is the k right after the largest
/// positive `S[i]` (lowest i on ties). A flat or straight curve has no
/// elbow and yields the smallest k evaluated.
pub fn select_k(elbow: &[ElbowPoint]) -> usize {
    let Some(first) = elbow.first() else {
        return 2;
    };
    let drops: Vec<f64> = elbow
        .windows(2)
        .map(|w| w[0].distortion - w[1].distortion)
        .collect();
    if drops.len() < 2 {
        return match drops.first() {
            Some(drop) if *drop > 0.0 => elbow[1].k,
            _ => first.k,
        };
    }

    let mut best: Option<(usize, f64)> = None;
    for (i, w) in drops.windows(2).enumerate() {
        let acceleration = w[0] - w[1];
        if acceleration > 0.0 && best.is_none_or(|(_, top)| acceleration > top) {
            best = Some((i, acceleration));
        }
    }
    best.map_or(first.k, |(i, _)| elbow[i + 1].k)
}
