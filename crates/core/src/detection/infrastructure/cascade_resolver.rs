use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::constants::FACEFINDER_CASCADE;

#[derive(Error, Debug)]
pub enum CascadeResolveError {
    #[error("cascade directory {0} does not exist")]
    Missing(PathBuf),
    #[error("no cascade directory found (searched {searched:?})")]
    NotFound { searched: Vec<PathBuf> },
}

/// Locate the directory holding the pico cascades.
///
/// Resolution order:
/// 1. Explicit path (must exist)
/// 2. User data directory (platform-specific)
/// 3. Bundled directory (for development / pre-packaged installs)
pub fn resolve(explicit: Option<&Path>, bundled_dir: &Path) -> Result<PathBuf, CascadeResolveError> {
    resolve_in(explicit, user_cascade_dir().as_deref(), bundled_dir)
}

fn resolve_in(
    explicit: Option<&Path>,
    user_dir: Option<&Path>,
    bundled_dir: &Path,
) -> Result<PathBuf, CascadeResolveError> {
    if let Some(dir) = explicit {
        if dir.is_dir() {
            return Ok(dir.to_path_buf());
        }
        return Err(CascadeResolveError::Missing(dir.to_path_buf()));
    }

    let mut searched = Vec::new();
    for dir in user_dir.into_iter().chain(std::iter::once(bundled_dir)) {
        if dir.join(FACEFINDER_CASCADE).is_file() {
            log::debug!("Using cascades from {}", dir.display());
            return Ok(dir.to_path_buf());
        }
        searched.push(dir.to_path_buf());
    }
    Err(CascadeResolveError::NotFound { searched })
}

/// Platform-specific cascade directory.
///
/// - macOS: `~/Library/Application Support/FaceDetection/cascades/`
/// - Linux: `$XDG_DATA_HOME/FaceDetection/cascades/` or `~/.local/share/FaceDetection/cascades/`
/// - Windows: `%APPDATA%/FaceDetection/cascades/`
pub fn user_cascade_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("FaceDetection").join("cascades"))
}
