//! HTTP client helpers for tests.

use serde::Deserialize;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TestClient {
    client: reqwest::Client,
    base_url: String,
}

impl TestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }

    pub async fn health(&self) -> Result<HealthResponse, TestClientError> {
        let resp = self.client.get(self.url("/")).send().await?;
        expect_json(resp).await
    }

    pub async fn reload(&self) -> Result<ReloadResponse, TestClientError> {
        let resp = self.client.post(self.url("/reload")).send().await?;
        expect_json(resp).await
    }

    /// Uploads `image` as the `file` part of a multipart form.
    pub async fn detect(&self, image: &[u8]) -> Result<DetectResponse, TestClientError> {
        let part = reqwest::multipart::Part::bytes(image.to_vec())
            .file_name("probe.jpg")
            .mime_str("image/jpeg")?;
        let form = reqwest::multipart::Form::new().part("file", part);
        self.detect_form(form).await
    }

    pub async fn detect_form(
        &self,
        form: reqwest::multipart::Form,
    ) -> Result<DetectResponse, TestClientError> {
        let resp = self
            .client
            .post(self.url("/detect"))
            .multipart(form)
            .send()
            .await?;
        expect_json(resp).await
    }
}

async fn expect_json<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, TestClientError> {
    let status = resp.status().as_u16();
    match status {
        200 => Ok(resp.json().await?),
        400 => {
            let body: ErrorResponse = resp.json().await?;
            Err(TestClientError::BadRequest(body.error))
        }
        _ => {
            let body = resp.text().await.unwrap_or_default();
            Err(TestClientError::UnexpectedStatus(status, body))
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub loaded_faces: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReloadResponse {
    pub status: String,
    pub message: String,
    pub count: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DetectResponse {
    pub count: usize,
    pub matches: Vec<DetectMatch>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DetectMatch {
    pub name: String,
    pub confidence: f64,
    #[serde(rename = "box")]
    pub bounding_box: [u32; 4],
    pub info: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TestClientError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Unexpected HTTP status: {0} - Body: {1}")]
    UnexpectedStatus(u16, String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}
