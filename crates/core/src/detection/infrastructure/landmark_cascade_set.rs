use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::cascade_reader::CascadeFormatError;
use super::puploc_cascade::PuplocCascade;
use crate::detection::domain::landmark_finder::{LandmarkFinder, LandmarkRequest};
use crate::detection::domain::point_localizer::{PointHint, PointLocalizer, RefinedPoint};

/// Landmark search window below the eye midpoint, as fractions of the
/// inter-ocular distance.
const ROW_OFFSET: f64 = 0.25;
const COL_OFFSET: f64 = 0.15;
const SCALE: f64 = 3.0;

#[derive(Error, Debug)]
pub enum LandmarkLoadError {
    #[error("failed to read landmark cascades from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid landmark cascade {path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: CascadeFormatError,
    },
}

/// Facial landmark cascades grouped by family name.
#[derive(Default)]
pub struct LandmarkCascadeSet {
    families: HashMap<String, Vec<PuplocCascade>>,
}

impl LandmarkCascadeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, family: impl Into<String>, cascade: PuplocCascade) {
        self.families.entry(family.into()).or_default().push(cascade);
    }

    /// Loads every regular file in `dir`, keyed by file name.
    pub fn from_dir(dir: &Path) -> Result<Self, LandmarkLoadError> {
        let io_err = |source| LandmarkLoadError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(io_err)? {
            let entry = entry.map_err(io_err)?;
            if entry.file_type().map_err(io_err)?.is_file() {
                paths.push(entry.path());
            }
        }
        paths.sort();

        let mut set = Self::new();
        for path in paths {
            let Some(family) = path.file_name().and_then(|n| n.to_str()).map(str::to_owned) else {
                log::warn!("Skipping landmark cascade with non UTF-8 name: {}", path.display());
                continue;
            };
            let bytes = std::fs::read(&path).map_err(|source| LandmarkLoadError::Io {
                path: path.clone(),
                source,
            })?;
            let cascade = PuplocCascade::unpack(&bytes)
                .map_err(|source| LandmarkLoadError::Format { path: path.clone(), source })?;
            set.insert(family, cascade);
        }

        log::info!("Loaded {} landmark cascades from {}", set.len(), dir.display());
        Ok(set)
    }

    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.families.keys().map(String::as_str)
    }

    /// Total number of cascades across all families.
    pub fn len(&self) -> usize {
        self.families.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Search window derived from the two eyes, or `None` when either is missing.
fn landmark_hint(request: &LandmarkRequest<'_>) -> Option<PointHint> {
    let (left, right) = (request.left_eye?, request.right_eye?);
    let dr = (left.row - right.row) as f64;
    let dc = (left.col - right.col) as f64;
    let dist = (dr * dr + dc * dc).sqrt();
    Some(PointHint {
        row: ((left.row + right.row) as f64 / 2.0 + ROW_OFFSET * dist) as i32,
        col: ((left.col + right.col) as f64 / 2.0 + COL_OFFSET * dist) as i32,
        scale: (SCALE * dist) as f32,
        perturbations: request.perturbations,
    })
}

impl LandmarkFinder for LandmarkCascadeSet {
    fn find_landmarks(
        &self,
        family: &str,
        request: &LandmarkRequest<'_>,
    ) -> Vec<Option<RefinedPoint>> {
        let Some(cascades) = self.families.get(family) else {
            log::debug!("No landmark cascades registered for family {family}");
            return Vec::new();
        };
        let hint = landmark_hint(request);
        cascades
            .iter()
            .map(|cascade| {
                let hint = hint?;
                cascade.localize(request.grid, &hint, request.angle, request.mirror)
            })
            .collect()
    }
}
