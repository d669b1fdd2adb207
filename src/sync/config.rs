use std::time::Duration;

use crate::config::Config;
use crate::constants::DEFAULT_AVATAR_TIMEOUT_SECS;
use crate::embedding::{DEFAULT_EXTRACTOR_MODEL, ExtractorModel};

/// Default number of candidates processed concurrently during a sync.
pub const DEFAULT_SYNC_CONCURRENCY: usize = 8;

#[derive(Debug, Clone)]
/// Tuning for [`SyncOrchestrator`](super::SyncOrchestrator).
pub struct SyncConfig {
    /// Candidates fetched and extracted at once (minimum 1).
    pub concurrency: usize,
    /// Upper bound on one avatar download.
    pub fetch_timeout: Duration,
    /// Detector used on avatar images.
    pub model: ExtractorModel,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_SYNC_CONCURRENCY,
            fetch_timeout: Duration::from_secs(DEFAULT_AVATAR_TIMEOUT_SECS),
            model: DEFAULT_EXTRACTOR_MODEL,
        }
    }
}

impl SyncConfig {
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }
}

impl From<&Config> for SyncConfig {
    fn from(config: &Config) -> Self {
        Self::default()
            .concurrency(config.sync_concurrency)
            .fetch_timeout(config.avatar_timeout)
    }
}
