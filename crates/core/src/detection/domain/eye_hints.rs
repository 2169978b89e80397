//! Starting positions for pupil localization, derived from the face window.
//!
//! Offsets are fractions of the face size measured from the window centre.
//! The left and right column offsets differ on purpose (empirical correction).

use super::point_localizer::PointHint;
use super::region_classifier::RawDetection;
use crate::shared::constants::{
    EYE_HINT_SCALE, EYE_ROW_OFFSET, LEFT_EYE_COL_OFFSET, RIGHT_EYE_COL_OFFSET,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EyeHints {
    pub left: PointHint,
    pub right: PointHint,
}

impl EyeHints {
    pub fn for_detection(detection: &RawDetection, perturbations: usize) -> Self {
        let scale = detection.scale as f32;
        let row = detection.row - (EYE_ROW_OFFSET * scale) as i32;
        let hint_scale = scale * EYE_HINT_SCALE;

        Self {
            left: PointHint {
                row,
                col: detection.col - (LEFT_EYE_COL_OFFSET * scale) as i32,
                scale: hint_scale,
                perturbations,
            },
            right: PointHint {
                row,
                col: detection.col + (RIGHT_EYE_COL_OFFSET * scale) as i32,
                scale: hint_scale,
                perturbations,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn detection(row: i32, col: i32, scale: i32) -> RawDetection {
        RawDetection {
            row,
            col,
            scale,
            score: 30.0,
        }
    }

    #[test]
    fn test_hint_positions_for_round_scale() {
        // scale 200: row offset 15, left 35, right 37, hint scale 50
        let hints = EyeHints::for_detection(&detection(300, 400, 200), 63);
        assert_eq!(hints.left.row, 285);
        assert_eq!(hints.right.row, 285);
        assert_eq!(hints.left.col, 365);
        assert_eq!(hints.right.col, 437);
        assert_relative_eq!(hints.left.scale, 50.0);
        assert_relative_eq!(hints.right.scale, 50.0);
        assert_eq!(hints.left.perturbations, 63);
        assert_eq!(hints.right.perturbations, 63);
    }

    #[test]
    fn test_offsets_truncate_before_subtracting() {
        // scale 57: 0.075 * 57 = 4.275 -> 4, 0.175 * 57 = 9.975 -> 9, 0.185 * 57 = 10.545 -> 10
        let hints = EyeHints::for_detection(&detection(100, 100, 57), 63);
        assert_eq!(hints.left.row, 96);
        assert_eq!(hints.left.col, 91);
        assert_eq!(hints.right.col, 110);
    }

    #[test]
    fn test_right_offset_is_larger_than_left() {
        let hints = EyeHints::for_detection(&detection(500, 500, 400), 63);
        let left_span = 500 - hints.left.col;
        let right_span = hints.right.col - 500;
        assert_eq!(left_span, 70);
        assert_eq!(right_span, 74);
    }

    #[rstest]
    #[case(51)]
    #[case(64)]
    #[case(99)]
    #[case(250)]
    #[case(1000)]
    fn test_left_hint_always_left_of_right_hint(#[case] scale: i32) {
        let hints = EyeHints::for_detection(&detection(600, 600, scale), 63);
        assert!(hints.left.col < hints.right.col);
    }
}
