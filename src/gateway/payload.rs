use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::cache::EnrollmentInfo;
use crate::embedding::BoundingBox;
use crate::scoring::MatchResult;

pub const HEALTH_STATUS_MESSAGE: &str = "AI Service is Running";
pub const RELOAD_STATUS_SUCCESS: &str = "success";
pub const RELOAD_MESSAGE: &str = "Database reloaded";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub loaded_faces: usize,
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub status: &'static str,
    pub message: &'static str,
    /// Records enrolled by this reload; `0` when the store could not be listed.
    pub count: usize,
}

impl ReloadResponse {
    pub fn new(count: usize) -> Self {
        Self {
            status: RELOAD_STATUS_SUCCESS,
            message: RELOAD_MESSAGE,
            count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DetectResponse {
    pub count: usize,
    pub matches: Vec<DetectMatch>,
}

impl DetectResponse {
    pub fn new(results: Vec<MatchResult>) -> Self {
        let matches: Vec<DetectMatch> = results.into_iter().map(DetectMatch::from).collect();
        Self {
            count: matches.len(),
            matches,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DetectMatch {
    pub name: String,
    pub confidence: f64,
    #[serde(rename = "box")]
    pub bounding_box: BoundingBox,
    /// Serialized as `{}` for unknown faces.
    #[serde(serialize_with = "info_or_empty")]
    pub info: Option<EnrollmentInfo>,
}

impl From<MatchResult> for DetectMatch {
    fn from(result: MatchResult) -> Self {
        Self {
            name: result.name,
            confidence: result.confidence,
            bounding_box: result.bounding_box,
            info: result.info,
        }
    }
}

fn info_or_empty<S>(info: &Option<EnrollmentInfo>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match info {
        Some(info) => info.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}
