use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, StatusCode, header};
use serde::Deserialize;
use tracing::debug;

use super::error::ExtractionError;
use super::extractor::{ExtractorModel, FaceExtractor};
use super::vector::{BoundingBox, DetectedFace, EmbeddingVector};

const EXTRACT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    faces: Vec<RawFace>,
}

/// Wire face before the embedding is validated.
#[derive(Debug, Deserialize)]
struct RawFace {
    #[serde(rename = "box")]
    bounding_box: BoundingBox,
    embedding: Vec<f64>,
}

impl RawFace {
    fn into_face(self) -> Result<DetectedFace, ExtractionError> {
        Ok(DetectedFace::new(
            self.bounding_box,
            EmbeddingVector::new(self.embedding)?,
        ))
    }
}

#[derive(Debug, Clone)]
/// Extractor sidecar reached over HTTP.
///
/// Sends the raw image as `application/octet-stream` to `POST {base_url}/extract?model=...`
/// and expects `{"faces": [{"box": [t, r, b, l], "embedding": [...]}]}` back. A `400`,
/// `415` or `422` reply means the image itself was rejected.
pub struct HttpFaceExtractor {
    http: HttpClient,
    base_url: String,
}

impl HttpFaceExtractor {
    /// Creates an extractor client for `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ExtractionError> {
        let http = HttpClient::builder()
            .timeout(EXTRACT_TIMEOUT)
            .build()
            .map_err(|e| ExtractionError::Unavailable {
                reason: e.to_string(),
            })?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/extract", self.base_url)
    }
}

#[async_trait]
impl FaceExtractor for HttpFaceExtractor {
    async fn extract(
        &self,
        image: &[u8],
        model: ExtractorModel,
    ) -> Result<Vec<DetectedFace>, ExtractionError> {
        let response = self
            .http
            .post(self.endpoint())
            .query(&[("model", model.as_str())])
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec())
            .send()
            .await?;

        let status = response.status();
        if matches!(
            status,
            StatusCode::BAD_REQUEST
                | StatusCode::UNSUPPORTED_MEDIA_TYPE
                | StatusCode::UNPROCESSABLE_ENTITY
        ) {
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractionError::DecodeFailed {
                reason: if body.is_empty() {
                    status.to_string()
                } else {
                    body
                },
            });
        }
        if !status.is_success() {
            return Err(ExtractionError::Unavailable {
                reason: format!("extractor returned {}", status),
            });
        }

        let bytes = response.bytes().await?;
        let parsed: ExtractResponse =
            serde_json::from_slice(&bytes).map_err(|e| ExtractionError::InvalidResponse {
                reason: e.to_string(),
            })?;

        let faces = parsed
            .faces
            .into_iter()
            .map(RawFace::into_face)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(faces = faces.len(), model = %model, "Extractor response");
        Ok(faces)
    }
}
