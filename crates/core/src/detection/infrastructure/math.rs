//! Shared math utilities for the pico cascade backend.
//!
//! Provides clamped pixel probing, in-plane rotation of probe offsets and the
//! window overlap measure used by clustering.

use ndarray::ArrayView2;

use crate::detection::domain::region_classifier::RawDetection;

/// In-plane rotation applied to probe offsets, precomputed from an angle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rotation {
    sin: f32,
    cos: f32,
}

impl Rotation {
    /// `turns` is a fraction of a full revolution; zero means no rotation.
    pub fn from_turns(turns: f64) -> Option<Self> {
        if turns == 0.0 {
            return None;
        }
        let theta = (turns * std::f64::consts::TAU) as f32;
        Some(Self {
            sin: theta.sin(),
            cos: theta.cos(),
        })
    }

    pub fn apply(&self, dr: f32, dc: f32) -> (f32, f32) {
        (
            self.cos * dr - self.sin * dc,
            self.sin * dr + self.cos * dc,
        )
    }
}

/// Pixel at (`row`, `col`), clamped to the image edges.
pub fn sample(pixels: &ArrayView2<'_, u8>, row: i32, col: i32) -> u8 {
    let (rows, cols) = pixels.dim();
    let r = row.clamp(0, rows as i32 - 1) as usize;
    let c = col.clamp(0, cols as i32 - 1) as usize;
    pixels[[r, c]]
}

/// Reads the pixel a tree node code points at.
///
/// Codes are signed offsets in 1/256ths of the window `scale`, relative to the
/// window centre (`row`, `col`).
pub fn probe(
    pixels: &ArrayView2<'_, u8>,
    row: i32,
    col: i32,
    scale: i32,
    code_r: i32,
    code_c: i32,
    rotation: Option<Rotation>,
) -> u8 {
    let (r, c) = match rotation {
        None => (
            (256 * row + code_r * scale) >> 8,
            (256 * col + code_c * scale) >> 8,
        ),
        Some(rot) => {
            let unit = scale as f32 / 256.0;
            let (dr, dc) = rot.apply(code_r as f32 * unit, code_c as f32 * unit);
            (row + dr.round() as i32, col + dc.round() as i32)
        }
    };
    sample(pixels, r, c)
}

/// Intersection over union of two square detection windows.
pub fn window_iou(a: &RawDetection, b: &RawDetection) -> f64 {
    let (r1, c1, s1) = (a.row as f64, a.col as f64, a.scale as f64);
    let (r2, c2, s2) = (b.row as f64, b.col as f64, b.scale as f64);

    let over_row = ((r1 + s1 / 2.0).min(r2 + s2 / 2.0) - (r1 - s1 / 2.0).max(r2 - s2 / 2.0)).max(0.0);
    let over_col = ((c1 + s1 / 2.0).min(c2 + s2 / 2.0) - (c1 - s1 / 2.0).max(c2 - s2 / 2.0)).max(0.0);
    let inter = over_row * over_col;
    if inter == 0.0 {
        return 0.0;
    }
    inter / (s1 * s1 + s2 * s2 - inter)
}

/// Index of the representative sample in `n` sorted perturbation results.
pub fn median_index(n: usize) -> usize {
    ((n as f64 / 2.0).round() as usize).min(n.saturating_sub(1))
}
