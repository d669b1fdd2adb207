//! Enrollment sync: store listing → avatar fetch → extraction → snapshot commit.

pub mod config;
pub mod error;
pub mod fetcher;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod orchestrator;
pub mod types;


pub use config::{DEFAULT_SYNC_CONCURRENCY, SyncConfig};
pub use error::{FetchError, RecordFailure, SyncError, SyncResult};
pub use fetcher::{AvatarFetcher, HttpAvatarFetcher};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockAvatarFetcher;
pub use orchestrator::SyncOrchestrator;
pub use types::SyncReport;
