//! Face embedding types and the extractor seam.
//!
//! - [`vector`] holds the validated [`EmbeddingVector`] and detection geometry.
//! - [`extractor`] defines the [`FaceExtractor`] trait used by sync and detect.
//! - [`http`] talks to an out-of-process extractor over HTTP.

mod error;
/// Extractor trait and model selection.
pub mod extractor;
/// HTTP extractor adapter.
pub mod http;
/// Mock extractor for tests.
#[cfg(any(test, feature = "mock"))]
pub mod mock;
/// Embedding vector and bounding box types.
pub mod vector;


pub use error::ExtractionError;
pub use extractor::{DEFAULT_EXTRACTOR_MODEL, ExtractorModel, FaceExtractor};
pub use http::HttpFaceExtractor;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockFaceExtractor;
pub use vector::{BoundingBox, DetectedFace, EmbeddingVector};
