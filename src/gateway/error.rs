use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::embedding::ExtractionError;

use super::VISAGE_STATUS_HEADER;

/// Request failures surfaced to clients.
///
/// The display text is the exact `error` message placed in the response body.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    /// Decoding or face extraction failed for an uploaded image.
    #[error("{0}")]
    Processing(String),
}

impl From<ExtractionError> for GatewayError {
    fn from(err: ExtractionError) -> Self {
        GatewayError::Processing(err.to_string())
    }
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, visage_status) = match &self {
            GatewayError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            GatewayError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "too_large"),
            GatewayError::Processing(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "processing_error")
            }
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            VISAGE_STATUS_HEADER,
            HeaderValue::from_static(visage_status),
        );

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status, headers, body).into_response()
    }
}
