use thiserror::Error;

use crate::shared::constants::{
    MAX_WINDOW_SIZE, MIN_WINDOW_SIZE, SCALE_FACTOR, SCAN_ANGLE, SHIFT_FACTOR,
};
use crate::shared::face::Bounds;
use crate::shared::pixel_grid::PixelGrid;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifierError {
    #[error("invalid scan window: min size {min_size}, max size {max_size}")]
    InvalidWindow { min_size: u32, max_size: u32 },
    #[error("scale factor must be greater than 1.0, got {0}")]
    InvalidScaleFactor(f64),
    #[error("shift factor must be positive, got {0}")]
    InvalidShiftFactor(f64),
    #[error("pixel grid is empty")]
    EmptyGrid,
}

/// A square candidate window reported by a region classifier.
///
/// `row`/`col` is the window centre, `scale` its side length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawDetection {
    pub row: i32,
    pub col: i32,
    pub scale: i32,
    pub score: f32,
}

impl RawDetection {
    /// Top-left anchored rectangle; halves truncate toward zero.
    pub fn bounds(&self) -> Bounds {
        Bounds {
            x: self.col - self.scale / 2,
            y: self.row - self.scale / 2,
            height: self.scale,
            width: self.scale,
        }
    }
}

/// Multi-scale window scan configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct ScanParams {
    pub min_size: u32,
    pub max_size: u32,
    pub shift_factor: f64,
    pub scale_factor: f64,
    /// Rotation as a fraction of a full turn (0.0..1.0).
    pub angle: f64,
}

impl ScanParams {
    pub fn validate(&self) -> Result<(), ClassifierError> {
        if self.min_size == 0 || self.min_size > self.max_size {
            return Err(ClassifierError::InvalidWindow {
                min_size: self.min_size,
                max_size: self.max_size,
            });
        }
        if self.scale_factor.is_nan() || self.scale_factor <= 1.0 {
            return Err(ClassifierError::InvalidScaleFactor(self.scale_factor));
        }
        if self.shift_factor.is_nan() || self.shift_factor <= 0.0 {
            return Err(ClassifierError::InvalidShiftFactor(self.shift_factor));
        }
        Ok(())
    }
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            min_size: MIN_WINDOW_SIZE,
            max_size: MAX_WINDOW_SIZE,
            shift_factor: SHIFT_FACTOR,
            scale_factor: SCALE_FACTOR,
            angle: SCAN_ANGLE,
        }
    }
}

/// Domain interface for scanning a grayscale image for face windows.
///
/// Implementations hold read-only model data and are shared across threads.
pub trait RegionClassifier: Send + Sync {
    fn classify(
        &self,
        grid: &PixelGrid,
        params: &ScanParams,
    ) -> Result<Vec<RawDetection>, ClassifierError>;
}
