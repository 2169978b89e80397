use super::point_localizer::RefinedPoint;
use crate::shared::pixel_grid::PixelGrid;

/// Inputs shared by every sub-cascade of a landmark family.
///
/// Eyes are passed through as found; an absent eye does not skip the search.
#[derive(Clone, Copy, Debug)]
pub struct LandmarkRequest<'a> {
    pub grid: &'a PixelGrid,
    pub left_eye: Option<RefinedPoint>,
    pub right_eye: Option<RefinedPoint>,
    pub perturbations: usize,
    pub angle: f64,
    pub mirror: bool,
}

/// Domain interface for locating facial landmarks relative to the eyes.
pub trait LandmarkFinder: Send + Sync {
    /// Runs every sub-cascade registered under `family`, one result each,
    /// in registration order. Unknown families yield no results.
    fn find_landmarks(&self, family: &str, request: &LandmarkRequest<'_>)
        -> Vec<Option<RefinedPoint>>;
}
