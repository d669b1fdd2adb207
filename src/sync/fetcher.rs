//! Avatar image retrieval.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tracing::warn;

use super::error::FetchError;

#[async_trait]
/// Downloads avatar image bytes.
pub trait AvatarFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

#[derive(Debug, Clone)]
/// HTTP(S) avatar fetcher with a per-request timeout.
pub struct HttpAvatarFetcher {
    http: HttpClient,
    timeout: Duration,
}

impl HttpAvatarFetcher {
    /// Builds the fetcher. `insecure_tls` disables certificate verification and should only
    /// be set for hosts known to serve broken chains.
    pub fn new(timeout: Duration, insecure_tls: bool) -> Result<Self, FetchError> {
        if insecure_tls {
            warn!("TLS certificate verification disabled for avatar downloads");
        }
        let http = HttpClient::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(insecure_tls)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self { http, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl AvatarFetcher for HttpAvatarFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let map_err = |e: reqwest::Error| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                    secs: self.timeout.as_secs(),
                }
            } else {
                FetchError::Request {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        };

        let response = self.http.get(url).send().await.map_err(map_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(map_err)?;
        Ok(bytes.to_vec())
    }
}
