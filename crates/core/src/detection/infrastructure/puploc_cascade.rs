//! Regression-tree point localizer (pico `puploc` and `lps` cascades).
//!
//! Unlike the face classifier, every tree votes a row/column displacement;
//! each stage moves the estimate and shrinks the search window. Several
//! jittered starts are run and the per-axis medians reported.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::cascade_reader::{CascadeFormatError, CascadeReader};
use super::math::{median_index, probe, Rotation};
use crate::detection::domain::point_localizer::{PointHint, PointLocalizer, RefinedPoint};
use crate::shared::pixel_grid::PixelGrid;

/// Fixed so that the same image and hint always localize to the same point.
const PERTURBATION_SEED: u64 = 0x7069_636f;

/// Jitter applied to each restart, as fractions of the hint scale.
const POSITION_JITTER: f32 = 0.15;
const SCALE_JITTER_BASE: f32 = 0.925;
const SCALE_JITTER_SPAN: f32 = 0.15;

pub struct PuplocCascade {
    stages: u32,
    scale_multiplier: f32,
    trees: u32,
    depth: u32,
    codes: Vec<i8>,
    /// (row, col) displacement pairs, one per leaf.
    predictions: Vec<f32>,
}

impl PuplocCascade {
    pub fn unpack(bytes: &[u8]) -> Result<Self, CascadeFormatError> {
        let mut reader = CascadeReader::new(bytes);
        let stages = reader.read_u32()?;
        let scale_multiplier = reader.read_f32()?;
        let trees = reader.read_u32()?;
        let depth = reader.read_depth()?;
        let leaves = 1usize << depth;

        let mut codes = Vec::new();
        let mut predictions = Vec::new();
        for _ in 0..(stages as usize * trees as usize) {
            codes.extend(reader.read_codes(4 * leaves - 4)?);
            reader.read_f32s(2 * leaves, &mut predictions)?;
        }

        Ok(Self {
            stages,
            scale_multiplier,
            trees,
            depth,
            codes,
            predictions,
        })
    }

    /// One deterministic descent from (`row`, `col`, `scale`).
    fn regress(
        &self,
        grid: &PixelGrid,
        mut row: f32,
        mut col: f32,
        mut scale: f32,
        rotation: Option<Rotation>,
        mirror: bool,
    ) -> (f32, f32) {
        let pixels = grid.as_ndarray();
        let leaves = 1usize << self.depth;
        let trees = self.trees as usize;
        let flip = if mirror { -1 } else { 1 };
        let mut root = 0usize;

        for stage in 0..self.stages as usize {
            let (mut dr, mut dc) = (0.0f32, 0.0f32);
            let (r, c, s) = (row as i32, col as i32, scale.round() as i32);
            for tree in 0..trees {
                let mut idx = 0usize;
                for _ in 0..self.depth {
                    let node = &self.codes[root + 4 * idx..root + 4 * idx + 4];
                    let p1 = probe(&pixels, r, c, s, node[0] as i32, flip * node[1] as i32, rotation);
                    let p2 = probe(&pixels, r, c, s, node[2] as i32, flip * node[3] as i32, rotation);
                    idx = 2 * idx + 1 + usize::from(p1 > p2);
                }
                let lut = 2 * (trees * leaves * stage + leaves * tree + idx - (leaves - 1));
                dr += self.predictions[lut];
                dc += flip as f32 * self.predictions[lut + 1];
                root += 4 * leaves - 4;
            }
            row += dr * scale;
            col += dc * scale;
            scale *= self.scale_multiplier;
        }
        (row, col)
    }
}

impl PointLocalizer for PuplocCascade {
    fn localize(
        &self,
        grid: &PixelGrid,
        hint: &PointHint,
        angle: f64,
        mirror: bool,
    ) -> Option<RefinedPoint> {
        if hint.perturbations == 0 || grid.data().is_empty() {
            return None;
        }

        let rotation = Rotation::from_turns(angle);
        let mut rng = StdRng::seed_from_u64(PERTURBATION_SEED);
        let (r, c, s) = (hint.row as f32, hint.col as f32, hint.scale);
        let mut rows = Vec::with_capacity(hint.perturbations);
        let mut cols = Vec::with_capacity(hint.perturbations);

        for _ in 0..hint.perturbations {
            let rt = r + s * POSITION_JITTER * (0.5 - rng.gen::<f32>());
            let ct = c + s * POSITION_JITTER * (0.5 - rng.gen::<f32>());
            let st = s * (SCALE_JITTER_BASE + SCALE_JITTER_SPAN * rng.gen::<f32>());
            let (row, col) = self.regress(grid, rt, ct, st, rotation, mirror);
            rows.push(row);
            cols.push(col);
        }

        rows.sort_by(f32::total_cmp);
        cols.sort_by(f32::total_cmp);
        let mid = median_index(rows.len());
        Some(RefinedPoint {
            row: rows[mid] as i32,
            col: cols[mid] as i32,
        })
    }
}
