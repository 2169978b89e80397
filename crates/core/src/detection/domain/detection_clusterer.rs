use super::region_classifier::RawDetection;

/// Domain interface for merging overlapping raw windows into single detections.
///
/// Output order is significant: faces are reported in the order returned here.
pub trait DetectionClusterer: Send + Sync {
    fn cluster(&self, detections: &[RawDetection], iou_threshold: f64) -> Vec<RawDetection>;
}
