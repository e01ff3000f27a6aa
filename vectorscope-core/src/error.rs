use thiserror::Error;
use crate::vector::VectorId;

/// The main result type for vectorscope-core operations.
pub type ScopeResult<T> = Result<T, ScopeError>;

/// Enum representing possible errors within the vectorscope-core library.
///
/// Every variant is recoverable: the operation that returned it left the
/// store and graph untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScopeError {
    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid vector: {0}")]
    InvalidVector(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Vector ID not found: {0}")]
    NotFound(VectorId),

    #[error("Unsupported distance metric: {0}")]
    UnsupportedMetric(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ScopeError {
    fn from(err: serde_json::Error) -> Self {
        ScopeError::Serialization(err.to_string())
    }
}
