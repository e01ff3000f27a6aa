use ndarray::Array1;
use serde::{Serialize, Deserialize};
use crate::error::{ScopeError, ScopeResult};

/// Identifier of a stored vector. Assigned in insertion order, never reused.
pub type VectorId = usize;

/// Type alias for the vector embedding representation.
/// Uses `ndarray::Array1<f32>` for efficient numerical operations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Embedding(pub Array1<f32>);

// Implement Deref to allow easy access to Array1 methods
impl std::ops::Deref for Embedding {
    type Target = Array1<f32>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::ops::DerefMut for Embedding {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Vec<f32>> for Embedding {
    fn from(vec: Vec<f32>) -> Self {
        Embedding(Array1::from(vec))
    }
}

impl From<&[f32]> for Embedding {
    fn from(slice: &[f32]) -> Self {
        Embedding(Array1::from(slice.to_vec()))
    }
}

impl From<Embedding> for Vec<f32> {
    fn from(embedding: Embedding) -> Self {
        embedding.0.to_vec()
    }
}

/// Checks that `vector` has exactly `dimension` elements and that all of them are finite.
pub(crate) fn validate_embedding(dimension: usize, vector: &Embedding) -> ScopeResult<()> {
    if vector.len() != dimension {
        return Err(ScopeError::DimensionMismatch {
            expected: dimension,
            actual: vector.len(),
        });
    }
    if let Some((pos, value)) = vector.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(ScopeError::InvalidVector(format!(
            "element {} is not finite ({})",
            pos, value
        )));
    }
    Ok(())
}

/// A single ranked hit returned by either index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub id: VectorId,
    /// Snapshot of the stored vector at search time.
    pub vector: Embedding,
    /// Distance under the metric used for the search; always `>= 0`.
    pub distance: f32,
    /// Cosine similarity, present only when the search used the cosine metric.
    pub similarity: Option<f32>,
}
