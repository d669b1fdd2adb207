use crate::cache::EnrollmentInfo;
use crate::constants::UNKNOWN_NAME;
use crate::embedding::BoundingBox;

#[derive(Debug, Clone, PartialEq)]
/// Decision for one detected face.
pub struct MatchResult {
    /// Matched display name, or [`UNKNOWN_NAME`].
    pub name: String,
    /// `round((1 - distance) * 100, 2)` on a match, exactly `0.0` otherwise.
    pub confidence: f64,
    pub bounding_box: BoundingBox,
    /// Metadata of the matched record; `None` when unmatched.
    pub info: Option<EnrollmentInfo>,
    /// Nearest distance observed, if the snapshot was non-empty.
    pub distance: Option<f64>,
}

impl MatchResult {
    /// An unmatched face.
    pub fn unknown(bounding_box: BoundingBox, distance: Option<f64>) -> Self {
        Self {
            name: UNKNOWN_NAME.to_string(),
            confidence: 0.0,
            bounding_box,
            info: None,
            distance,
        }
    }

    pub fn matched(
        info: EnrollmentInfo,
        distance: f64,
        confidence: f64,
        bounding_box: BoundingBox,
    ) -> Self {
        Self {
            name: info.name.clone(),
            confidence,
            bounding_box,
            info: Some(info),
            distance: Some(distance),
        }
    }

    /// Returns `true` if the face matched an enrolled identity.
    pub fn is_match(&self) -> bool {
        self.info.is_some()
    }
}

impl std::fmt::Display for MatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.info {
            Some(info) => write!(
                f,
                "MATCH {} ({}, confidence: {:.2})",
                info.name, info.id, self.confidence
            ),
            None => write!(f, "UNKNOWN"),
        }
    }
}
