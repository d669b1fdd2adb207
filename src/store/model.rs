use serde::{Deserialize, Serialize};

use crate::cache::EnrollmentInfo;
use crate::constants::{DEFAULT_DISPLAY_NAME, DEFAULT_NOEL_EMOJI};

/// A user document as held by the external store.
///
/// Only documents with an `avatarUrl` are enrollment candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    pub id: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub noel_emoji: Option<String>,
}

impl UserDocument {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_avatar_url(mut self, url: impl Into<String>) -> Self {
        self.avatar_url = Some(url.into());
        self
    }

    pub fn with_noel_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.noel_emoji = Some(emoji.into());
        self
    }

    /// Converts to candidate metadata, applying field defaults.
    ///
    /// Returns `None` when the document has no avatar reference.
    pub fn into_candidate(self) -> Option<EnrollmentInfo> {
        let avatar_url = self.avatar_url?;
        Some(EnrollmentInfo {
            id: self.id,
            name: self.name.unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string()),
            noel_emoji: self
                .noel_emoji
                .unwrap_or_else(|| DEFAULT_NOEL_EMOJI.to_string()),
            avatar_url,
        })
    }
}
