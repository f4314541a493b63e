//! Scoring module - NES line-clear scoring and the per-level gravity table

use crate::types::LINE_SCORES;

/// Frames per automatic descent for levels 0-18.
const GRAVITY_TABLE: [u32; 19] = [
    48, 43, 38, 33, 28, 23, 18, 13, 8, 6, 5, 5, 5, 4, 4, 4, 3, 3, 3,
];

/// Gravity threshold in frames for a level.
/// Levels 19-28 run at 2 frames per row, 29 and beyond at 1.
pub fn gravity_frames(level: u32) -> u32 {
    match level {
        0..=18 => GRAVITY_TABLE[level as usize],
        19..=28 => 2,
        _ => 1,
    }
}

/// Points awarded for clearing `lines` rows at once on `level`.
/// A simultaneous 4-row clear is the maximum representable bonus.
pub fn line_score(lines: usize, level: u32) -> u32 {
    LINE_SCORES[lines.min(4)] * (level + 1)
}

/// Level progression: one level per 10 total lines.
pub fn level_for_lines(lines: u32) -> u32 {
    lines / 10
}
