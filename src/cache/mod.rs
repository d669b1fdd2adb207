//! In-memory enrollment cache.

pub mod snapshot;
pub mod store;
pub mod types;


pub use snapshot::Snapshot;
pub use store::CacheStore;
pub use types::{EnrollmentInfo, EnrollmentRecord};
