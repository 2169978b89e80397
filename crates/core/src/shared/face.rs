use serde::Serialize;

/// Axis-aligned face rectangle in image pixels.
///
/// Field order is the serialized order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub height: i32,
    pub width: i32,
}

/// A facial feature position in image pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// A detected face with whatever features could be localized.
///
/// Feature points are `None` when localization found nothing; absent features
/// are omitted from JSON rather than written as `null`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Face {
    pub bounds: Bounds,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mouth: Option<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right_eye: Option<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_eye: Option<Point>,
}

impl Face {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            mouth: None,
            right_eye: None,
            left_eye: None,
        }
    }

    pub fn has_features(&self) -> bool {
        self.mouth.is_some() || self.right_eye.is_some() || self.left_eye.is_some()
    }
}
