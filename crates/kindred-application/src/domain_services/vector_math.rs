//! Vector primitives
//!
//! Inputs are `f32` as stored; accumulation happens in `f64`.

use kindred_domain::error::{Error, Result};

fn ensure_same_dimension(a: &[f32], b: &[f32]) -> Result<()> {
    if a.len() == b.len() {
        Ok(())
    } else {
        Err(Error::dimension_mismatch(a.len(), b.len()))
    }
}

/// Cosine similarity in `[-1, 1]`.
///
/// Returns 0 when either vector is all zeros.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64> {
    ensure_same_dimension(a, b)?;
    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok((dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0))
}

/// Sum of squared per-dimension differences
pub fn squared_distance(a: &[f32], b: &[f32]) -> Result<f64> {
    ensure_same_dimension(a, b)?;
    Ok(a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = f64::from(*x) - f64::from(*y);
            d * d
        })
        .sum())
}

/// Euclidean distance, zero exactly when the vectors are equal
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> Result<f64> {
    squared_distance(a, b).map(f64::sqrt)
}

/// Per-dimension arithmetic mean
#[allow(clippy::cast_possible_truncation)]
pub fn centroid<V: AsRef<[f32]>>(vectors: &[V]) -> Result<Vec<f32>> {
    let first = vectors
        .first()
        .ok_or_else(|| Error::empty_input("centroid of an empty vector set"))?
        .as_ref();
    let mut sums = vec![0.0_f64; first.len()];
    for vector in vectors {
        let vector = vector.as_ref();
        ensure_same_dimension(first, vector)?;
        for (sum, value) in sums.iter_mut().zip(vector) {
            *sum += f64::from(*value);
        }
    }
    let count = vectors.len() as f64;
    Ok(sums.into_iter().map(|s| (s / count) as f32).collect())
}
