use tracing::debug;

use crate::cache::Snapshot;
use crate::constants::MATCH_DISTANCE_THRESHOLD;
use crate::embedding::{BoundingBox, DetectedFace, EmbeddingVector};

use super::types::MatchResult;

/// Converts a match distance into a percentage rounded to two decimals.
#[inline]
pub fn confidence_from_distance(distance: f64) -> f64 {
    round_to_cents((1.0 - distance) * 100.0)
}

/// Rounds the exact binary value to two decimals, ties to even.
///
/// `{:.2}` formats from the exact value of the float, so `0.125` becomes `0.12` and a
/// value stored just below `.xx5` rounds down, where `(x * 100.0).round()` would not.
pub(crate) fn round_to_cents(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

/// Brute-force nearest-neighbour matcher over a [`Snapshot`].
#[derive(Debug, Clone, Copy)]
pub struct Matcher {
    threshold: f64,
}

impl Default for Matcher {
    fn default() -> Self {
        Self {
            threshold: MATCH_DISTANCE_THRESHOLD,
        }
    }
}

impl Matcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Index and distance of the closest record. Ties keep the lowest index.
    pub fn nearest(&self, snapshot: &Snapshot, probe: &EmbeddingVector) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (index, record) in snapshot.iter().enumerate() {
            let distance = probe.distance(&record.embedding);
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((index, distance)),
            }
        }
        best
    }

    /// Matches one probe against `snapshot`.
    pub fn match_probe(
        &self,
        snapshot: &Snapshot,
        probe: &EmbeddingVector,
        bounding_box: BoundingBox,
    ) -> MatchResult {
        let Some((index, distance)) = self.nearest(snapshot, probe) else {
            return MatchResult::unknown(bounding_box, None);
        };

        if distance < self.threshold {
            // nearest() only yields indices inside the snapshot
            let record = &snapshot.records()[index];
            let confidence = confidence_from_distance(distance);
            debug!(
                record_id = %record.id(),
                distance,
                confidence,
                "Face matched"
            );
            MatchResult::matched(record.info.clone(), distance, confidence, bounding_box)
        } else {
            debug!(distance, threshold = self.threshold, "Nearest face above threshold");
            MatchResult::unknown(bounding_box, Some(distance))
        }
    }

    /// Matches every detected face against the same snapshot, preserving order.
    pub fn match_faces(&self, snapshot: &Snapshot, faces: &[DetectedFace]) -> Vec<MatchResult> {
        faces
            .iter()
            .map(|face| self.match_probe(snapshot, &face.embedding, face.bounding_box))
            .collect()
    }
}
