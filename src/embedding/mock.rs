//! In-memory extractor keyed by exact image bytes.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::error::ExtractionError;
use super::extractor::{ExtractorModel, FaceExtractor};
use super::vector::DetectedFace;

#[derive(Default)]
pub struct MockFaceExtractor {
    images: RwLock<HashMap<Vec<u8>, Vec<DetectedFace>>>,
    calls: AtomicUsize,
}

impl MockFaceExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the faces returned for `image`. Unregistered bytes fail to decode.
    pub fn insert(&self, image: impl Into<Vec<u8>>, faces: Vec<DetectedFace>) {
        self.images
            .write()
            .expect("lock poisoned")
            .insert(image.into(), faces);
    }

    pub fn remove(&self, image: &[u8]) {
        self.images.write().expect("lock poisoned").remove(image);
    }

    /// Number of `extract` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl FaceExtractor for MockFaceExtractor {
    async fn extract(
        &self,
        image: &[u8],
        _model: ExtractorModel,
    ) -> Result<Vec<DetectedFace>, ExtractionError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.images
            .read()
            .map_err(|_| ExtractionError::Unavailable {
                reason: "lock poisoned".to_string(),
            })?
            .get(image)
            .cloned()
            .ok_or_else(|| ExtractionError::DecodeFailed {
                reason: "unrecognized image data".to_string(),
            })
    }
}
