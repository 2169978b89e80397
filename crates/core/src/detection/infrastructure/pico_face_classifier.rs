//! Pixel-intensity-comparison face classifier (pico `facefinder` cascades).
//!
//! Each tree node compares two pixels addressed relative to the window
//! centre; leaf predictions accumulate through the cascade and a window is
//! rejected as soon as the running sum falls to a stage threshold.

use ndarray::ArrayView2;

use super::cascade_reader::{CascadeFormatError, CascadeReader};
use super::math::{probe, Rotation};
use crate::detection::domain::region_classifier::{
    ClassifierError, RawDetection, RegionClassifier, ScanParams,
};
use crate::shared::pixel_grid::PixelGrid;

/// Leading bytes of a facefinder file that carry no model data.
const HEADER_PADDING: usize = 8;

pub struct PicoFaceClassifier {
    depth: u32,
    /// Node codes per tree, four per node, root slot padded with zeros.
    codes: Vec<i8>,
    predictions: Vec<f32>,
    thresholds: Vec<f32>,
}

impl PicoFaceClassifier {
    /// Parses a packed facefinder cascade.
    pub fn unpack(bytes: &[u8]) -> Result<Self, CascadeFormatError> {
        let mut reader = CascadeReader::new(bytes);
        reader.skip(HEADER_PADDING)?;
        let depth = reader.read_depth()?;
        let trees = reader.read_u32()? as usize;
        let leaves = 1usize << depth;

        let mut codes = Vec::new();
        let mut predictions = Vec::new();
        let mut thresholds = Vec::new();
        for _ in 0..trees {
            codes.extend_from_slice(&[0, 0, 0, 0]);
            codes.extend(reader.read_codes(4 * leaves - 4)?);
            reader.read_f32s(leaves, &mut predictions)?;
            thresholds.push(reader.read_f32()?);
        }

        log::debug!("Unpacked face cascade: depth {depth}, {trees} trees");
        Ok(Self {
            depth,
            codes,
            predictions,
            thresholds,
        })
    }

    pub fn tree_count(&self) -> usize {
        self.thresholds.len()
    }

    /// Confidence that the window centred at (`row`, `col`) with side
    /// `scale` holds a face, or `None` when a stage rejects it.
    fn classify_window(
        &self,
        pixels: &ArrayView2<'_, u8>,
        row: i32,
        col: i32,
        scale: i32,
        rotation: Option<Rotation>,
    ) -> Option<f32> {
        let leaves = 1usize << self.depth;
        let mut root = 0usize;
        let mut out = 0.0f32;

        for (tree, &threshold) in self.thresholds.iter().enumerate() {
            let mut idx = 1usize;
            for _ in 0..self.depth {
                let node = &self.codes[root + 4 * idx..root + 4 * idx + 4];
                let p1 = probe(pixels, row, col, scale, node[0] as i32, node[1] as i32, rotation);
                let p2 = probe(pixels, row, col, scale, node[2] as i32, node[3] as i32, rotation);
                idx = 2 * idx + usize::from(p1 <= p2);
            }
            out += self.predictions[leaves * tree + idx - leaves];
            if out <= threshold {
                return None;
            }
            root += 4 * leaves;
        }

        let last = self.thresholds.last().copied().unwrap_or(0.0);
        Some(out - last)
    }
}

impl RegionClassifier for PicoFaceClassifier {
    fn classify(
        &self,
        grid: &PixelGrid,
        params: &ScanParams,
    ) -> Result<Vec<RawDetection>, ClassifierError> {
        params.validate()?;
        if grid.data().is_empty() {
            return Err(ClassifierError::EmptyGrid);
        }

        let pixels = grid.as_ndarray();
        let rotation = Rotation::from_turns(params.angle);
        let (rows, cols) = (grid.rows(), grid.cols());
        let max_size = params.max_size as i32;
        let mut detections = Vec::new();
        let mut size = params.min_size as i32;

        while size <= max_size {
            let step = ((params.shift_factor * size as f64) as i32).max(1);
            let offset = size / 2 + 1;

            let mut row = offset;
            while row <= rows - offset {
                let mut col = offset;
                while col <= cols - offset {
                    if let Some(score) = self.classify_window(&pixels, row, col, size, rotation) {
                        if score > 0.0 {
                            detections.push(RawDetection {
                                row,
                                col,
                                scale: size,
                                score,
                            });
                        }
                    }
                    col += step;
                }
                row += step;
            }

            size = ((size as f64 * params.scale_factor) as i32).max(size + 1);
        }

        log::trace!("Face scan produced {} raw windows", detections.len());
        Ok(detections)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Packs a facefinder cascade from `(codes, predictions, threshold)` trees.
    pub(crate) fn pack_face_cascade(depth: u32, trees: &[(Vec<i8>, Vec<f32>, f32)]) -> Vec<u8> {
        let mut bytes = vec![0u8; HEADER_PADDING];
        bytes.extend_from_slice(&depth.to_le_bytes());
        bytes.extend_from_slice(&(trees.len() as u32).to_le_bytes());
        for (codes, preds, threshold) in trees {
            bytes.extend(codes.iter().map(|&c| c as u8));
            for p in preds {
                bytes.extend_from_slice(&p.to_le_bytes());
            }
            bytes.extend_from_slice(&threshold.to_le_bytes());
        }
        bytes
    }

    /// Single stump comparing the window centre with a point a quarter
    /// window below it.
    fn stump(threshold: f32) -> PicoFaceClassifier {
        let bytes = pack_face_cascade(1, &[(vec![0, 0, 64, 0], vec![-1.0, 5.0], threshold)]);
        PicoFaceClassifier::unpack(&bytes).unwrap()
    }

    fn row_gradient(size: u32, ascending: bool) -> PixelGrid {
        let mut data = Vec::with_capacity((size * size) as usize);
        for r in 0..size {
            for _ in 0..size {
                let v = (r * 4).min(255) as u8;
                data.push(if ascending { v } else { 255 - v });
            }
        }
        PixelGrid::new(data, size, size)
    }

    fn fixed_window(size: u32) -> ScanParams {
        ScanParams {
            min_size: size,
            max_size: size,
            ..ScanParams::default()
        }
    }

    #[test]
    fn test_unpack_reads_trees() {
        let bytes = pack_face_cascade(
            2,
            &[
                (vec![0; 12], vec![0.0; 4], -1.0),
                (vec![0; 12], vec![0.0; 4], -1.0),
            ],
        );
        let cascade = PicoFaceClassifier::unpack(&bytes).unwrap();
        assert_eq!(cascade.tree_count(), 2);
        assert_eq!(cascade.codes.len(), 2 * 16);
    }

    #[test]
    fn test_unpack_truncated_fails() {
        let mut bytes = pack_face_cascade(1, &[(vec![0; 4], vec![0.0; 2], 0.0)]);
        bytes.truncate(bytes.len() - 2);
        assert!(matches!(
            PicoFaceClassifier::unpack(&bytes),
            Err(CascadeFormatError::Truncated { .. })
        ));
    }

    #[test]
    fn test_uniform_cascade_accepts_every_window() {
        // Equal pixels take the `<=` branch: leaf 1 scores 5.
        let bytes = pack_face_cascade(1, &[(vec![0; 4], vec![-1.0, 5.0], 0.0)]);
        let cascade = PicoFaceClassifier::unpack(&bytes).unwrap();
        let grid = PixelGrid::new(vec![128; 40 * 40], 40, 40);

        let detections = cascade.classify(&grid, &fixed_window(20)).unwrap();

        // offset 11, step 2: rows and cols 11, 13, ..., 29
        assert_eq!(detections.len(), 100);
        assert!(detections.iter().all(|d| d.scale == 20 && d.score == 5.0));
        assert_eq!((detections[0].row, detections[0].col), (11, 11));
        assert_eq!((detections[99].row, detections[99].col), (29, 29));
    }

    #[test]
    fn test_comparison_direction() {
        let cascade = stump(0.0);
        let params = fixed_window(20);
        // Brighter below the centre: p1 <= p2 picks the positive leaf.
        assert!(!cascade.classify(&row_gradient(40, true), &params).unwrap().is_empty());
        // Darker below: negative leaf, rejected.
        assert!(cascade.classify(&row_gradient(40, false), &params).unwrap().is_empty());
    }

    #[test]
    fn test_stage_threshold_rejects() {
        let cascade = stump(10.0);
        let detections = cascade.classify(&row_gradient(40, true), &fixed_window(20)).unwrap();
        assert!(detections.is_empty());
    }

    #[test]
    fn test_scan_stays_inside_image() {
        let bytes = pack_face_cascade(1, &[(vec![0; 4], vec![-1.0, 5.0], 0.0)]);
        let cascade = PicoFaceClassifier::unpack(&bytes).unwrap();
        let grid = PixelGrid::new(vec![90; 64 * 48], 64, 48);
        let params = ScanParams {
            min_size: 20,
            max_size: 40,
            ..ScanParams::default()
        };

        let detections = cascade.classify(&grid, &params).unwrap();

        assert!(!detections.is_empty());
        for d in &detections {
            let half = d.scale / 2;
            assert!(d.row - half >= 0 && d.row + half <= 48);
            assert!(d.col - half >= 0 && d.col + half <= 64);
            assert!(d.scale >= 20 && d.scale <= 40);
        }
    }

    #[test]
    fn test_window_larger_than_image_yields_nothing() {
        let bytes = pack_face_cascade(1, &[(vec![0; 4], vec![-1.0, 5.0], 0.0)]);
        let cascade = PicoFaceClassifier::unpack(&bytes).unwrap();
        let grid = PixelGrid::new(vec![0; 10 * 10], 10, 10);
        assert!(cascade.classify(&grid, &fixed_window(20)).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_params_propagate() {
        let cascade = stump(0.0);
        let grid = PixelGrid::new(vec![0; 4], 2, 2);
        let params = ScanParams {
            scale_factor: 0.9,
            ..ScanParams::default()
        };
        assert_eq!(
            cascade.classify(&grid, &params),
            Err(ClassifierError::InvalidScaleFactor(0.9))
        );
    }

    #[test]
    fn test_empty_grid_rejected() {
        let cascade = stump(0.0);
        let grid = PixelGrid::new(Vec::new(), 0, 0);
        assert_eq!(
            cascade.classify(&grid, &ScanParams::default()),
            Err(ClassifierError::EmptyGrid)
        );
    }
}
