use std::sync::Arc;

use crate::detection::domain::detection_clusterer::DetectionClusterer;
use crate::detection::domain::eye_hints::EyeHints;
use crate::detection::domain::face_detector::{DetectError, FaceDetector};
use crate::detection::domain::landmark_cluster::LandmarkCluster;
use crate::detection::domain::landmark_finder::{LandmarkFinder, LandmarkRequest};
use crate::detection::domain::point_localizer::{PointLocalizer, RefinedPoint};
use crate::detection::domain::region_classifier::{
    ClassifierError, RawDetection, RegionClassifier, ScanParams,
};
use crate::shared::constants::{
    CLUSTER_IOU_THRESHOLD, DISCARD_SCORE_THRESHOLD, FEATURE_MIN_SCALE, FEATURE_SCORE_THRESHOLD,
    MOUTH_LANDMARK_FAMILIES, PERTURBATIONS,
};
use crate::shared::face::Face;
use crate::shared::pixel_grid::PixelGrid;

/// Face detection pipeline: classify → cluster → gate → localize features.
///
/// Holds only shared read-only capabilities, so one instance serves any
/// number of concurrent callers.
pub struct DetectFacesUseCase {
    classifier: Arc<dyn RegionClassifier>,
    clusterer: Arc<dyn DetectionClusterer>,
    localizer: Arc<dyn PointLocalizer>,
    landmarks: Arc<dyn LandmarkFinder>,
    scan_params: ScanParams,
}

impl DetectFacesUseCase {
    pub fn new(
        classifier: Arc<dyn RegionClassifier>,
        clusterer: Arc<dyn DetectionClusterer>,
        localizer: Arc<dyn PointLocalizer>,
        landmarks: Arc<dyn LandmarkFinder>,
    ) -> Self {
        Self {
            classifier,
            clusterer,
            localizer,
            landmarks,
            scan_params: ScanParams::default(),
        }
    }

    /// Overrides the default multi-scale scan settings.
    pub fn with_scan_params(mut self, scan_params: ScanParams) -> Self {
        self.scan_params = scan_params;
        self
    }

    /// Runs detection on an already decoded grayscale image.
    ///
    /// Faces come back in cluster order. Classifier failures abort the whole
    /// call; missing eyes or mouth only leave the field empty.
    pub fn detect(&self, grid: &PixelGrid) -> Result<Vec<Face>, ClassifierError> {
        let raw = self.classifier.classify(grid, &self.scan_params)?;
        let clustered = self.clusterer.cluster(&raw, CLUSTER_IOU_THRESHOLD);

        let faces: Vec<Face> = clustered
            .iter()
            .filter(|d| d.score > DISCARD_SCORE_THRESHOLD)
            .map(|d| self.build_face(grid, d))
            .collect();

        log::debug!(
            "{} raw windows, {} clusters, {} faces",
            raw.len(),
            clustered.len(),
            faces.len()
        );
        Ok(faces)
    }

    fn build_face(&self, grid: &PixelGrid, detection: &RawDetection) -> Face {
        let mut face = Face::new(detection.bounds());
        if detection.score <= FEATURE_SCORE_THRESHOLD || detection.scale <= FEATURE_MIN_SCALE {
            return face;
        }

        let angle = self.scan_params.angle;
        let hints = EyeHints::for_detection(detection, PERTURBATIONS);
        let left = self.localizer.localize(grid, &hints.left, angle, false);
        let right = self.localizer.localize(grid, &hints.right, angle, false);

        face.left_eye = left.filter(RefinedPoint::is_located).map(RefinedPoint::to_point);
        face.right_eye = right.filter(RefinedPoint::is_located).map(RefinedPoint::to_point);

        let request = LandmarkRequest {
            grid,
            left_eye: left,
            right_eye: right,
            perturbations: PERTURBATIONS,
            angle,
            mirror: false,
        };
        let mut mouth = LandmarkCluster::new();
        for family in MOUTH_LANDMARK_FAMILIES {
            self.landmarks
                .find_landmarks(family, &request)
                .into_iter()
                .flatten()
                .filter(RefinedPoint::is_located)
                .for_each(|p| mouth.add(p));
        }
        face.mouth = mouth.center();

        log::debug!(
            "Face at ({}, {}) size {}: left eye {:?}, right eye {:?}, mouth {:?} from {} points",
            detection.col,
            detection.row,
            detection.scale,
            face.left_eye,
            face.right_eye,
            face.mouth,
            mouth.len()
        );
        face
    }
}

impl FaceDetector for DetectFacesUseCase {
    fn detect_faces(&self, image: &[u8]) -> Result<Vec<Face>, DetectError> {
        let grid = PixelGrid::decode(image).map_err(DetectError::ImageDecode)?;
        Ok(self.detect(&grid)?)
    }
}
