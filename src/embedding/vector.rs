use serde::{Deserialize, Serialize};

use crate::constants::{DimValidationError, EMBEDDING_DIM, validate_embedding_dim};

/// A validated face embedding of exactly [`EMBEDDING_DIM`] finite components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct EmbeddingVector(Vec<f64>);

impl EmbeddingVector {
    /// Validates length and finiteness.
    pub fn new(values: Vec<f64>) -> Result<Self, DimValidationError> {
        validate_embedding_dim(values.len(), EMBEDDING_DIM)?;
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(DimValidationError::NonFinite { index });
        }
        Ok(Self(values))
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(&self, other: &EmbeddingVector) -> f64 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| {
                let d = a - b;
                d * d
            })
            .sum::<f64>()
            .sqrt()
    }
}

impl TryFrom<Vec<f64>> for EmbeddingVector {
    type Error = DimValidationError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl From<EmbeddingVector> for Vec<f64> {
    fn from(v: EmbeddingVector) -> Self {
        v.0
    }
}

/// Face location in source-image pixels, serialized as `[top, right, bottom, left]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "[u32; 4]", into = "[u32; 4]")]
pub struct BoundingBox {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl BoundingBox {
    pub fn new(top: u32, right: u32, bottom: u32, left: u32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

impl From<[u32; 4]> for BoundingBox {
    fn from([top, right, bottom, left]: [u32; 4]) -> Self {
        Self::new(top, right, bottom, left)
    }
}

impl From<BoundingBox> for [u32; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.top, b.right, b.bottom, b.left]
    }
}

/// One face reported by the extractor, in detection order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedFace {
    #[serde(rename = "box")]
    pub bounding_box: BoundingBox,
    pub embedding: EmbeddingVector,
}

impl DetectedFace {
    pub fn new(bounding_box: BoundingBox, embedding: EmbeddingVector) -> Self {
        Self {
            bounding_box,
            embedding,
        }
    }
}
