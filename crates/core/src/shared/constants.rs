//! Detection tuning surface and service defaults.
//!
//! The scan and gate values were tuned against production photographs with
//! the pico `facefinder`/`puploc` cascades; keep them in sync with the
//! cascades they were tuned for.

/// Smallest square window the face scan tries, in pixels.
pub const MIN_WINDOW_SIZE: u32 = 20;
/// Largest square window the face scan tries, in pixels.
pub const MAX_WINDOW_SIZE: u32 = 1000;
/// Window step as a fraction of the window size.
pub const SHIFT_FACTOR: f64 = 0.1;
/// Growth factor between consecutive window sizes.
pub const SCALE_FACTOR: f64 = 1.1;
/// Scan rotation as a fraction of a full turn.
pub const SCAN_ANGLE: f64 = 0.0;

/// Overlap ratio above which two raw windows are merged into one detection.
pub const CLUSTER_IOU_THRESHOLD: f64 = 0.2;

/// Clustered detections scoring at or below this are dropped.
///
/// Clustered scores are sums over the merged windows, which is why this sits
/// on a different scale from [`FEATURE_SCORE_THRESHOLD`].
pub const DISCARD_SCORE_THRESHOLD: f32 = 20.0;
/// Eye/mouth localization needs a score strictly above this...
pub const FEATURE_SCORE_THRESHOLD: f32 = 5.0;
/// ...and a window strictly larger than this many pixels.
pub const FEATURE_MIN_SCALE: i32 = 50;

/// Eye hints sit this fraction of the face size above the face centre.
pub const EYE_ROW_OFFSET: f32 = 0.075;
/// Left eye hint column offset (fraction of face size, towards smaller columns).
pub const LEFT_EYE_COL_OFFSET: f32 = 0.175;
/// Right eye hint column offset. Deliberately not equal to the left offset.
pub const RIGHT_EYE_COL_OFFSET: f32 = 0.185;
/// Eye search window as a fraction of the face size.
pub const EYE_HINT_SCALE: f32 = 0.25;

/// Randomised restarts per point localization.
pub const PERTURBATIONS: usize = 63;

/// Landmark families whose points together outline the mouth:
/// upper lip centre, lower lip centre and the two corner variants.
pub const MOUTH_LANDMARK_FAMILIES: &[&str] = &["lp93", "lp84", "lp82", "lp81"];

pub const FACEFINDER_CASCADE: &str = "facefinder";
pub const PUPLOC_CASCADE: &str = "puploc";
pub const LANDMARK_CASCADE_DIR: &str = "lps";

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 5;
/// 2 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1 << 21;
