use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::error::FetchError;
use super::fetcher::AvatarFetcher;

/// URL-keyed avatar fetcher. Unknown URLs answer 404.
#[derive(Default)]
pub struct MockAvatarFetcher {
    avatars: RwLock<HashMap<String, Vec<u8>>>,
    delay_ms: AtomicU64,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockAvatarFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, url: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.avatars
            .write()
            .expect("lock poisoned")
            .insert(url.into(), bytes.into());
    }

    pub fn remove(&self, url: &str) {
        self.avatars.write().expect("lock poisoned").remove(url);
    }

    /// Delays every fetch by `delay`.
    pub fn set_delay(&self, delay: Duration) {
        self.delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of fetches observed running at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AvatarFetcher for MockAvatarFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        let result = self
            .avatars
            .read()
            .expect("lock poisoned")
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            });

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
