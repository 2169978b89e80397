use crate::shared::face::Point;
use crate::shared::pixel_grid::PixelGrid;

/// A localized feature position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefinedPoint {
    pub row: i32,
    pub col: i32,
}

impl RefinedPoint {
    /// Localizers report misses as points on or outside the top/left edge.
    pub fn is_located(&self) -> bool {
        self.row > 0 && self.col > 0
    }

    pub fn to_point(self) -> Point {
        Point {
            x: self.col,
            y: self.row,
        }
    }
}

/// Starting position and search window for a point localization.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointHint {
    pub row: i32,
    pub col: i32,
    pub scale: f32,
    pub perturbations: usize,
}

/// Domain interface for refining a rough position into a precise feature point.
pub trait PointLocalizer: Send + Sync {
    /// Returns `None` when nothing could be localized.
    fn localize(
        &self,
        grid: &PixelGrid,
        hint: &PointHint,
        angle: f64,
        mirror: bool,
    ) -> Option<RefinedPoint>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::inside(RefinedPoint { row: 10, col: 12 }, true)]
    #[case::zero_row(RefinedPoint { row: 0, col: 12 }, false)]
    #[case::zero_col(RefinedPoint { row: 10, col: 0 }, false)]
    #[case::negative(RefinedPoint { row: -3, col: -7 }, false)]
    fn test_is_located(#[case] point: RefinedPoint, #[case] expected: bool) {
        assert_eq!(point.is_located(), expected);
    }

    #[test]
    fn test_to_point_swaps_to_xy() {
        let p = RefinedPoint { row: 50, col: 30 }.to_point();
        assert_eq!(p, Point { x: 30, y: 50 });
    }
}
