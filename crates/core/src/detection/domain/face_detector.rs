use thiserror::Error;

use super::region_classifier::ClassifierError;
use crate::shared::face::Face;

#[derive(Error, Debug)]
pub enum DetectError {
    /// The bytes are not an image in a supported raster format.
    #[error("unable to decode image: {0}")]
    ImageDecode(#[source] image::ImageError),
    #[error("region classifier failed: {0}")]
    Classifier(#[from] ClassifierError),
}

/// Domain interface for turning encoded image bytes into detected faces.
///
/// Shared across request threads, hence `&self` and `Sync`.
pub trait FaceDetector: Send + Sync {
    fn detect_faces(&self, image: &[u8]) -> Result<Vec<Face>, DetectError>;
}
