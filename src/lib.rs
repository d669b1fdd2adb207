//! Visage library crate (used by the server binary and integration tests).
//!
//! # Public API Surface
//!
//! ## Core Types
//! - [`Config`], [`ConfigError`] - Server configuration
//! - [`CacheStore`], [`Snapshot`], [`EnrollmentRecord`] - Atomically swapped enrollment set
//! - [`Matcher`], [`MatchResult`] - Nearest-neighbour identity decisions
//!
//! ## Sync
//! - [`SyncOrchestrator`] - Store listing, avatar fetch, extraction and commit
//! - [`EnrollmentStore`], [`FirestoreStore`] - Where enrollment candidates come from
//! - [`AvatarFetcher`], [`HttpAvatarFetcher`] - Avatar downloads
//!
//! ## Embedding
//! - [`FaceExtractor`], [`HttpFaceExtractor`] - Image bytes to `(box, embedding)` pairs
//! - [`EmbeddingVector`], [`validate_embedding_dim`] - Dimension-checked embeddings
//!
//! ## HTTP
//! - [`gateway::create_router_with_state`], [`HandlerState`] - Axum routes
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod cache;
pub mod config;
pub mod constants;
pub mod embedding;
#[cfg(any(test, feature = "mock"))]
pub mod fixtures;
pub mod gateway;
pub mod scoring;
pub mod store;
pub mod sync;

pub use cache::{CacheStore, EnrollmentInfo, EnrollmentRecord, Snapshot};
pub use config::{Config, ConfigError};
pub use constants::{
    DimValidationError, EMBEDDING_DIM, MATCH_DISTANCE_THRESHOLD, UNKNOWN_NAME,
    validate_embedding_dim,
};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockFaceExtractor;
pub use embedding::{
    BoundingBox, DEFAULT_EXTRACTOR_MODEL, DetectedFace, EmbeddingVector, ExtractionError,
    ExtractorModel, FaceExtractor, HttpFaceExtractor,
};
pub use gateway::{GatewayError, HandlerState, VISAGE_STATUS_HEADER, create_router_with_state};
pub use scoring::{MatchResult, Matcher, confidence_from_distance};
#[cfg(any(test, feature = "mock"))]
pub use store::MockEnrollmentStore;
pub use store::{EnrollmentStore, FirestoreStore, StoreError, UserDocument};
#[cfg(any(test, feature = "mock"))]
pub use sync::MockAvatarFetcher;
pub use sync::{
    AvatarFetcher, FetchError, HttpAvatarFetcher, RecordFailure, SyncConfig, SyncError,
    SyncOrchestrator, SyncReport,
};
