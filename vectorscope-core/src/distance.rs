//! Defines distance metrics for comparing vectors.
//!
//! Both metrics are expressed as *distances*: lower values mean more similar,
//! and every value is `>= 0`. Cosine is converted with `1 - similarity`.

use std::fmt;
use std::str::FromStr;

use ndarray::ArrayView1;
use serde::{Serialize, Deserialize};
use crate::error::{ScopeError, ScopeResult};

/// Enum representing supported distance metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Euclidean (L2) distance.
    #[default]
    Euclidean,
    /// Cosine distance, `1 - cosine_similarity`.
    Cosine,
}

impl DistanceMetric {
    /// All metrics, in the order they are advertised to callers.
    pub const ALL: [DistanceMetric; 2] = [DistanceMetric::Euclidean, DistanceMetric::Cosine];

    pub fn name(&self) -> &'static str {
        match self {
            DistanceMetric::Euclidean => "euclidean",
            DistanceMetric::Cosine => "cosine",
        }
    }

    /// Distance between two vectors under this metric.
    pub fn distance(&self, v1: ArrayView1<f32>, v2: ArrayView1<f32>) -> ScopeResult<f32> {
        calculate_distance(*self, v1, v2)
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DistanceMetric {
    type Err = ScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "euclidean" | "l2" => Ok(DistanceMetric::Euclidean),
            "cosine" => Ok(DistanceMetric::Cosine),
            _ => Err(ScopeError::UnsupportedMetric(s.to_string())),
        }
    }
}

fn check_dimensions(v1: &ArrayView1<f32>, v2: &ArrayView1<f32>) -> ScopeResult<()> {
    if v1.len() != v2.len() {
        return Err(ScopeError::DimensionMismatch {
            expected: v1.len(),
            actual: v2.len(),
        });
    }
    Ok(())
}

/// Dot product accumulated in f64 so squared sums of extreme f32 values neither
/// underflow to zero nor overflow to infinity.
fn dot_f64(v1: &ArrayView1<f32>, v2: &ArrayView1<f32>) -> f64 {
    v1.iter()
        .zip(v2.iter())
        .map(|(a, b)| f64::from(*a) * f64::from(*b))
        .sum()
}

/// Euclidean (L2) distance: `sqrt(sum((a_i - b_i)^2))`.
pub fn euclidean(v1: ArrayView1<f32>, v2: ArrayView1<f32>) -> ScopeResult<f32> {
    check_dimensions(&v1, &v2)?;
    let sum_sq: f64 = v1
        .iter()
        .zip(v2.iter())
        .map(|(a, b)| {
            let diff = f64::from(*a) - f64::from(*b);
            diff * diff
        })
        .sum();
    Ok(sum_sq.sqrt() as f32)
}

/// Cosine similarity in `[-1, 1]`.
///
/// A zero-magnitude vector has similarity `0` with anything.
pub fn cosine_similarity(v1: ArrayView1<f32>, v2: ArrayView1<f32>) -> ScopeResult<f32> {
    check_dimensions(&v1, &v2)?;
    let dot_product = dot_f64(&v1, &v2);
    let norm_sq_v1 = dot_f64(&v1, &v1);
    let norm_sq_v2 = dot_f64(&v2, &v2);

    if norm_sq_v1 == 0.0 || norm_sq_v2 == 0.0 {
        return Ok(0.0);
    }

    // sqrt(x * x) == x in f64 for these sums, so self-similarity is exactly 1.
    let similarity = dot_product / (norm_sq_v1 * norm_sq_v2).sqrt();
    Ok(similarity.clamp(-1.0, 1.0) as f32)
}

/// Cosine distance, `1 - cosine_similarity`, in `[0, 2]`.
pub fn cosine_distance(v1: ArrayView1<f32>, v2: ArrayView1<f32>) -> ScopeResult<f32> {
    Ok(1.0 - cosine_similarity(v1, v2)?)
}

/// Calculates the distance between two vectors based on the specified metric.
///
/// Returns `ScopeError::DimensionMismatch` if vectors have different lengths.
pub fn calculate_distance(
    metric: DistanceMetric,
    v1: ArrayView1<f32>,
    v2: ArrayView1<f32>,
) -> ScopeResult<f32> {
    match metric {
        DistanceMetric::Euclidean => euclidean(v1, v2),
        DistanceMetric::Cosine => cosine_distance(v1, v2),
    }
}
