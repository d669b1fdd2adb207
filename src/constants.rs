//! Cross-cutting, shared constants.
//!
//! # Dimension Invariants
//!
//! The embedding dimension is a compile-time invariant shared by the extractor adapter,
//! the enrollment cache and the matcher. Every [`EmbeddingVector`](crate::embedding::EmbeddingVector)
//! is validated against [`EMBEDDING_DIM`] at construction, so downstream code never has to
//! re-check lengths.

/// Number of components in a face embedding.
pub const EMBEDDING_DIM: usize = 128;

/// Maximum Euclidean distance (exclusive) at which a probe is considered the same identity.
pub const MATCH_DISTANCE_THRESHOLD: f64 = 0.5;

/// Display name reported for faces that match no enrolled identity.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Fallback display name for store documents without a `name` field.
pub const DEFAULT_DISPLAY_NAME: &str = "Unknown User";

/// Fallback decoration for store documents without a `noelEmoji` field.
pub const DEFAULT_NOEL_EMOJI: &str = "🎄";

/// Per-record avatar download timeout.
pub const DEFAULT_AVATAR_TIMEOUT_SECS: u64 = 10;

/// Error returned when an embedding fails validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimValidationError {
    /// Embedding length does not match [`EMBEDDING_DIM`].
    DimensionMismatch { expected: usize, actual: usize },
    /// Embedding contains a NaN or infinite component.
    NonFinite { index: usize },
}

impl std::fmt::Display for DimValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "dimension mismatch: expected {}, got {}",
                    expected, actual
                )
            }
            Self::NonFinite { index } => {
                write!(f, "embedding component {} is not finite", index)
            }
        }
    }
}

impl std::error::Error for DimValidationError {}

/// Validates that a runtime embedding dimension matches the expected dimension.
///
/// # Example
///
/// ```
/// use visage::constants::{validate_embedding_dim, EMBEDDING_DIM};
///
/// validate_embedding_dim(128, EMBEDDING_DIM).unwrap();
/// assert!(validate_embedding_dim(512, EMBEDDING_DIM).is_err());
/// ```
pub fn validate_embedding_dim(actual: usize, expected: usize) -> Result<(), DimValidationError> {
    if actual != expected {
        return Err(DimValidationError::DimensionMismatch { expected, actual });
    }
    Ok(())
}
