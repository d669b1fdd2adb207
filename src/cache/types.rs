use serde::{Deserialize, Serialize};

use crate::embedding::EmbeddingVector;

/// Display metadata returned alongside a match (`info` in detect responses).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentInfo {
    /// Store document id.
    pub id: String,
    pub name: String,
    pub noel_emoji: String,
    pub avatar_url: String,
}

/// A known identity: metadata plus the embedding learned from its avatar.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrollmentRecord {
    pub info: EnrollmentInfo,
    pub embedding: EmbeddingVector,
}

impl EnrollmentRecord {
    pub fn new(info: EnrollmentInfo, embedding: EmbeddingVector) -> Self {
        Self { info, embedding }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.info.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.info.name
    }
}
