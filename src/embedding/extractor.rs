use async_trait::async_trait;

use super::error::ExtractionError;
use super::vector::DetectedFace;

/// Detector speed/accuracy selector forwarded to the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractorModel {
    /// Histogram-of-gradients detector (fast, CPU).
    #[default]
    Hog,
    /// CNN detector (accurate, wants a GPU).
    Cnn,
}

impl ExtractorModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractorModel::Hog => "hog",
            ExtractorModel::Cnn => "cnn",
        }
    }
}

impl std::fmt::Display for ExtractorModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ExtractorModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hog" => Ok(Self::Hog),
            "cnn" => Ok(Self::Cnn),
            _ => Err(format!("Unknown extractor model: {}", s)),
        }
    }
}

/// Model used for both enrollment and detection.
pub const DEFAULT_EXTRACTOR_MODEL: ExtractorModel = ExtractorModel::Hog;

#[async_trait]
/// Turns encoded image bytes into detected faces with embeddings.
pub trait FaceExtractor: Send + Sync {
    /// Decodes `image` and returns every detected face, in detection order.
    ///
    /// An image without faces is `Ok(vec![])`, not an error.
    async fn extract(
        &self,
        image: &[u8],
        model: ExtractorModel,
    ) -> Result<Vec<DetectedFace>, ExtractionError>;
}
