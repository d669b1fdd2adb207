//! Nearest-neighbour identity matching.
//!
//! A probe is compared with every enrolled embedding of one [`Snapshot`](crate::cache::Snapshot)
//! by Euclidean distance. The closest record wins (lowest index on ties) if its distance is
//! strictly below [`MATCH_DISTANCE_THRESHOLD`](crate::constants::MATCH_DISTANCE_THRESHOLD).
//!
//! Callers load the snapshot once and pass it in, so every face of a request is scored
//! against the same enrollment set even if a reload lands mid-request.

pub mod matcher;
pub mod types;


pub use matcher::{Matcher, confidence_from_distance};
pub use types::MatchResult;
