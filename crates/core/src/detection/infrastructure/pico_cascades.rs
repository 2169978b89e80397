use std::path::{Path, PathBuf};

use thiserror::Error;

use super::cascade_reader::CascadeFormatError;
use super::landmark_cascade_set::{LandmarkCascadeSet, LandmarkLoadError};
use super::pico_face_classifier::PicoFaceClassifier;
use super::puploc_cascade::PuplocCascade;
use crate::shared::constants::{FACEFINDER_CASCADE, LANDMARK_CASCADE_DIR, PUPLOC_CASCADE};

#[derive(Error, Debug)]
pub enum CascadeLoadError {
    #[error("failed to read cascade {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid cascade {path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: CascadeFormatError,
    },
    #[error(transparent)]
    Landmarks(#[from] LandmarkLoadError),
}

/// The full set of cascades the detection pipeline runs on.
pub struct PicoCascades {
    pub face: PicoFaceClassifier,
    pub pupils: PuplocCascade,
    pub landmarks: LandmarkCascadeSet,
}

impl PicoCascades {
    /// Loads `facefinder`, `puploc` and the `lps/` landmark directory.
    pub fn load(dir: &Path) -> Result<Self, CascadeLoadError> {
        let face = read(&dir.join(FACEFINDER_CASCADE), PicoFaceClassifier::unpack)?;
        let pupils = read(&dir.join(PUPLOC_CASCADE), PuplocCascade::unpack)?;
        let landmarks = LandmarkCascadeSet::from_dir(&dir.join(LANDMARK_CASCADE_DIR))?;

        log::info!(
            "Loaded cascades from {}: {} face trees, {} landmark cascades",
            dir.display(),
            face.tree_count(),
            landmarks.len()
        );
        Ok(Self {
            face,
            pupils,
            landmarks,
        })
    }
}

fn read<T>(
    path: &Path,
    unpack: impl FnOnce(&[u8]) -> Result<T, CascadeFormatError>,
) -> Result<T, CascadeLoadError> {
    let bytes = std::fs::read(path).map_err(|source| CascadeLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    unpack(&bytes).map_err(|source| CascadeLoadError::Format {
        path: path.to_path_buf(),
        source,
    })
}
