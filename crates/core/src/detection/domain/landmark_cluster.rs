use super::point_localizer::RefinedPoint;
use crate::shared::face::Point;

/// Running bounding box of located landmark points.
///
/// The centre of the box is the combined estimate for a feature described by
/// several landmarks (e.g. the mouth from lip centres and corners).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LandmarkCluster {
    /// (min_row, max_row, min_col, max_col)
    extent: Option<(i32, i32, i32, i32)>,
    count: usize,
}

impl LandmarkCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, point: RefinedPoint) {
        self.extent = Some(match self.extent {
            None => (point.row, point.row, point.col, point.col),
            Some((min_r, max_r, min_c, max_c)) => (
                min_r.min(point.row),
                max_r.max(point.row),
                min_c.min(point.col),
                max_c.max(point.col),
            ),
        });
        self.count += 1;
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Integer centre of the bounding box, or `None` with no points.
    pub fn center(&self) -> Option<Point> {
        self.extent.map(|(min_r, max_r, min_c, max_c)| Point {
            x: min_c + (max_c - min_c) / 2,
            y: min_r + (max_r - min_r) / 2,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(row: i32, col: i32) -> RefinedPoint {
        RefinedPoint { row, col }
    }

    #[test]
    fn test_empty_has_no_center() {
        let cluster = LandmarkCluster::new();
        assert!(cluster.is_empty());
        assert_eq!(cluster.center(), None);
    }

    #[test]
    fn test_single_point_is_its_own_center() {
        let mut cluster = LandmarkCluster::new();
        cluster.add(pt(120, 80));
        assert_eq!(cluster.len(), 1);
        assert_eq!(cluster.center(), Some(Point { x: 80, y: 120 }));
    }

    #[test]
    fn test_center_of_mouth_outline() {
        let mut cluster = LandmarkCluster::new();
        cluster.add(pt(300, 250)); // upper lip
        cluster.add(pt(340, 252)); // lower lip
        cluster.add(pt(320, 220)); // left corner
        cluster.add(pt(321, 285)); // right corner
        // cols 220..285 -> 220 + 32 = 252; rows 300..340 -> 320
        assert_eq!(cluster.center(), Some(Point { x: 252, y: 320 }));
    }

    #[test]
    fn test_center_lies_within_contributing_points() {
        let points = [pt(1500, 2200), pt(1490, 2400), pt(1530, 2310)];
        let mut cluster = LandmarkCluster::new();
        for p in points {
            cluster.add(p);
        }
        let c = cluster.center().unwrap();
        assert!(points.iter().map(|p| p.col).min().unwrap() <= c.x);
        assert!(points.iter().map(|p| p.col).max().unwrap() >= c.x);
        assert!(points.iter().map(|p| p.row).min().unwrap() <= c.y);
        assert!(points.iter().map(|p| p.row).max().unwrap() >= c.y);
    }

    #[test]
    fn test_large_coordinates_are_not_clipped() {
        // Points beyond 1000px must still bound the box.
        let mut cluster = LandmarkCluster::new();
        cluster.add(pt(1800, 2400));
        cluster.add(pt(1810, 2420));
        assert_eq!(cluster.center(), Some(Point { x: 2410, y: 1805 }));
    }
}
