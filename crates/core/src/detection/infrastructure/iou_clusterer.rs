use super::math::window_iou;
use crate::detection::domain::detection_clusterer::DetectionClusterer;
use crate::detection::domain::region_classifier::RawDetection;

/// Greedy overlap clustering of raw scan windows.
///
/// Windows are visited strongest first. Each unassigned window seeds a
/// cluster of every later window overlapping it by more than the threshold;
/// the cluster takes the integer mean position and size of its members and
/// the sum of their scores.
#[derive(Clone, Copy, Debug, Default)]
pub struct IouDetectionClusterer;

impl IouDetectionClusterer {
    pub fn new() -> Self {
        Self
    }
}

impl DetectionClusterer for IouDetectionClusterer {
    fn cluster(&self, detections: &[RawDetection], iou_threshold: f64) -> Vec<RawDetection> {
        let mut sorted = detections.to_vec();
        sorted.sort_by(|a, b| b.score.total_cmp(&a.score));

        let mut assigned = vec![false; sorted.len()];
        let mut clusters = Vec::new();

        for i in 0..sorted.len() {
            if assigned[i] {
                continue;
            }
            let (mut row, mut col, mut scale, mut score, mut n) = (0i64, 0i64, 0i64, 0.0f32, 0i64);
            for j in i..sorted.len() {
                if window_iou(&sorted[i], &sorted[j]) > iou_threshold {
                    assigned[j] = true;
                    row += sorted[j].row as i64;
                    col += sorted[j].col as i64;
                    scale += sorted[j].scale as i64;
                    score += sorted[j].score;
                    n += 1;
                }
            }
            if n > 0 {
                clusters.push(RawDetection {
                    row: (row / n) as i32,
                    col: (col / n) as i32,
                    scale: (scale / n) as i32,
                    score,
                });
            }
        }

        log::trace!(
            "Clustered {} raw windows into {} detections",
            detections.len(),
            clusters.len()
        );
        clusters
    }
}
