use std::sync::{Arc, Mutex, PoisonError};

use futures_util::future::{BoxFuture, FutureExt, Shared};
use futures_util::{StreamExt, stream};
use tracing::{debug, error, info, warn};

use crate::cache::{CacheStore, EnrollmentInfo, EnrollmentRecord, Snapshot};
use crate::embedding::{EmbeddingVector, FaceExtractor};
use crate::store::EnrollmentStore;

use super::config::SyncConfig;
use super::error::{FetchError, RecordFailure, SyncError, SyncResult};
use super::fetcher::AvatarFetcher;
use super::types::SyncReport;

type InFlightSync = Shared<BoxFuture<'static, SyncResult<SyncReport>>>;
type InFlightSlot = Arc<Mutex<Option<InFlightSync>>>;

/// Rebuilds the enrollment snapshot from the store and commits it to the [`CacheStore`].
///
/// At most one sync runs at a time. A call made while a sync is running joins it and
/// receives that sync's outcome. The sync itself runs on a spawned task, so dropping a
/// caller never abandons it before the commit.
pub struct SyncOrchestrator {
    worker: Arc<SyncWorker>,
    in_flight: InFlightSlot,
}

struct SyncWorker {
    cache: Arc<CacheStore>,
    store: Arc<dyn EnrollmentStore>,
    fetcher: Arc<dyn AvatarFetcher>,
    extractor: Arc<dyn FaceExtractor>,
    config: SyncConfig,
}

/// Empties the in-flight slot when the sync task finishes, panics or is cancelled.
struct ClearInFlight(InFlightSlot);

impl Drop for ClearInFlight {
    fn drop(&mut self) {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).take();
    }
}

impl SyncOrchestrator {
    pub fn new(
        cache: Arc<CacheStore>,
        store: Arc<dyn EnrollmentStore>,
        fetcher: Arc<dyn AvatarFetcher>,
        extractor: Arc<dyn FaceExtractor>,
        config: SyncConfig,
    ) -> Self {
        Self {
            worker: Arc::new(SyncWorker {
                cache,
                store,
                fetcher,
                extractor,
                config,
            }),
            in_flight: Arc::new(Mutex::new(None)),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.worker.config
    }

    pub fn cache(&self) -> &Arc<CacheStore> {
        &self.worker.cache
    }

    /// Returns `true` while a sync is running.
    pub fn is_syncing(&self) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Lists candidates, enrolls each one independently and commits the result.
    ///
    /// A listing failure returns [`SyncError::StoreListing`] and keeps the current snapshot.
    /// Once listing succeeds the new snapshot is always committed, even when empty.
    /// Must be called from within a tokio runtime.
    pub async fn sync(&self) -> SyncResult<SyncReport> {
        let running = {
            let mut slot = self
                .in_flight
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            match slot.as_ref() {
                Some(running) => {
                    debug!("Joining in-flight enrollment sync");
                    running.clone()
                }
                None => {
                    let running = self.spawn_sync();
                    *slot = Some(running.clone());
                    running
                }
            }
        };
        running.await
    }

    // Called with the slot locked; the task's guard can only clear it after we release.
    fn spawn_sync(&self) -> InFlightSync {
        let worker = Arc::clone(&self.worker);
        let guard = ClearInFlight(Arc::clone(&self.in_flight));
        let handle = tokio::spawn(async move {
            let _guard = guard;
            worker.run().await
        });

        async move {
            handle.await.unwrap_or_else(|e| {
                error!(error = %e, "Enrollment sync task failed");
                Err(SyncError::Interrupted(e.to_string()))
            })
        }
        .boxed()
        .shared()
    }
}

impl SyncWorker {
    async fn run(&self) -> SyncResult<SyncReport> {
        info!("Starting enrollment sync");

        let candidates = self.store.list_candidates().await.map_err(|e| {
            error!(error = %e, "Enrollment sync aborted, keeping current snapshot");
            SyncError::StoreListing(e)
        })?;

        let outcomes: Vec<Result<EnrollmentRecord, RecordFailure>> = stream::iter(candidates)
            .map(|candidate| self.enroll(candidate))
            .buffered(self.config.concurrency.max(1))
            .collect()
            .await;

        let mut records = Vec::with_capacity(outcomes.len());
        let mut failed = 0usize;
        for outcome in outcomes {
            match outcome {
                Ok(record) => records.push(record),
                Err(_) => failed += 1,
            }
        }

        let report = SyncReport {
            succeeded: records.len(),
            failed,
        };
        let previous = self.cache.replace(Snapshot::new(records));

        info!(
            succeeded = report.succeeded,
            failed = report.failed,
            previous = previous.len(),
            "Enrollment sync complete"
        );
        Ok(report)
    }

    async fn enroll(&self, info: EnrollmentInfo) -> Result<EnrollmentRecord, RecordFailure> {
        match self.first_embedding(&info.avatar_url).await {
            Ok(embedding) => {
                info!(record_id = %info.id, name = %info.name, "Enrolled face");
                Ok(EnrollmentRecord::new(info, embedding))
            }
            Err(failure) => {
                warn!(
                    record_id = %info.id,
                    name = %info.name,
                    error = %failure,
                    "Skipping enrollment candidate"
                );
                Err(failure)
            }
        }
    }

    async fn first_embedding(&self, avatar_url: &str) -> Result<EmbeddingVector, RecordFailure> {
        let bytes = tokio::time::timeout(self.config.fetch_timeout, self.fetcher.fetch(avatar_url))
            .await
            .map_err(|_| FetchError::Timeout {
                url: avatar_url.to_string(),
                secs: self.config.fetch_timeout.as_secs(),
            })??;

        let faces = self.extractor.extract(&bytes, self.config.model).await?;

        // Group photos enroll only their first detected face.
        faces
            .into_iter()
            .next()
            .map(|face| face.embedding)
            .ok_or(RecordFailure::NoFace)
    }
}

impl std::fmt::Debug for SyncOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncOrchestrator")
            .field("config", &self.worker.config)
            .field("cache", &self.worker.cache)
            .field("syncing", &self.is_syncing())
            .finish()
    }
}
