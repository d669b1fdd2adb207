use std::sync::Arc;

use crate::cache::CacheStore;
use crate::config::DEFAULT_MAX_UPLOAD_BYTES;
use crate::embedding::FaceExtractor;
use crate::scoring::Matcher;
use crate::sync::SyncOrchestrator;

#[derive(Clone)]
pub struct HandlerState {
    pub cache: Arc<CacheStore>,

    pub orchestrator: Arc<SyncOrchestrator>,

    pub extractor: Arc<dyn FaceExtractor>,

    pub matcher: Matcher,

    pub max_upload_bytes: usize,
}

impl HandlerState {
    /// Shares the orchestrator's cache so reloads are visible to detect.
    pub fn new(orchestrator: Arc<SyncOrchestrator>, extractor: Arc<dyn FaceExtractor>) -> Self {
        Self {
            cache: Arc::clone(orchestrator.cache()),
            orchestrator,
            extractor,
            matcher: Matcher::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}

impl std::fmt::Debug for HandlerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerState")
            .field("cache", &self.cache)
            .field("matcher", &self.matcher)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish()
    }
}
