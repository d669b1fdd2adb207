//! External document store holding enrollment records.

pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod model;


pub use client::{EnrollmentStore, FirestoreStore};
pub use error::StoreError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEnrollmentStore;
pub use model::UserDocument;

/// Collection holding user documents.
pub const DEFAULT_COLLECTION_NAME: &str = "users";

/// Public Firestore REST endpoint.
pub const DEFAULT_STORE_URL: &str = "https://firestore.googleapis.com";
