use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use super::client::EnrollmentStore;
use super::error::StoreError;
use super::model::UserDocument;
use crate::cache::EnrollmentInfo;

const MOCK_STORE_URL: &str = "mock://store";

#[derive(Default)]
pub struct MockEnrollmentStore {
    documents: RwLock<Vec<UserDocument>>,
    unreachable: AtomicBool,
    list_calls: AtomicUsize,
}

impl MockEnrollmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(documents: Vec<UserDocument>) -> Self {
        Self {
            documents: RwLock::new(documents),
            ..Default::default()
        }
    }

    pub fn insert(&self, document: UserDocument) {
        self.documents
            .write()
            .expect("lock poisoned")
            .push(document);
    }

    pub fn clear(&self) {
        self.documents.write().expect("lock poisoned").clear();
    }

    /// Makes subsequent listings fail with [`StoreError::ConnectionFailed`].
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EnrollmentStore for MockEnrollmentStore {
    async fn list_candidates(&self) -> Result<Vec<EnrollmentInfo>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(StoreError::ConnectionFailed {
                url: MOCK_STORE_URL.to_string(),
                message: "store unreachable".to_string(),
            });
        }

        let documents = self
            .documents
            .read()
            .map_err(|_| StoreError::QueryFailed {
                collection: "users".to_string(),
                message: "lock poisoned".to_string(),
            })?;

        Ok(documents
            .iter()
            .cloned()
            .filter_map(UserDocument::into_candidate)
            .collect())
    }
}
