use thiserror::Error;

use crate::constants::DimValidationError;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("failed to decode image: {reason}")]
    DecodeFailed { reason: String },

    #[error("face extractor unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("invalid extractor response: {reason}")]
    InvalidResponse { reason: String },

    #[error("invalid embedding: {0}")]
    InvalidEmbedding(#[from] DimValidationError),
}

impl From<reqwest::Error> for ExtractionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ExtractionError::InvalidResponse {
                reason: err.to_string(),
            }
        } else {
            ExtractionError::Unavailable {
                reason: err.to_string(),
            }
        }
    }
}
