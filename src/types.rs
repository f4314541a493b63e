//! Core types and timing constants shared across the engine
//! This module contains pure data types with no external dependencies

/// Board dimensions
pub const BOARD_WIDTH: u8 = 10;
pub const BOARD_HEIGHT: u8 = 20;

/// The host drives one simulation tick per frame at this rate.
pub const FRAMES_PER_SECOND: u32 = 60;

/// Frames a direction must be held before auto-shift starts repeating.
pub const DAS_DELAY_FRAMES: u32 = 16;
/// Frames between auto-shift moves once the DAS delay has elapsed.
pub const ARR_FRAMES: u32 = 6;
/// Frames the simulation freezes after a lock that cleared rows.
pub const LINE_CLEAR_DELAY_FRAMES: u8 = 20;
/// Gravity threshold while soft drop is held.
pub const SOFT_DROP_GRAVITY_FRAMES: u32 = 2;

/// Pivot where new pieces enter the board.
pub const SPAWN_PIVOT: (i8, i8) = (4, 1);
/// Pivot renderers use for the "next" preview box. Carries no board interaction.
pub const PREVIEW_PIVOT: (i8, i8) = (10, 2);

/// Line clear scoring, indexed by rows cleared at once (NES table).
/// The per-lock maximum is 4 rows.
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

/// Tetromino piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PieceKind {
    T,
    L,
    J,
    S,
    Z,
    O,
    I,
}

impl PieceKind {
    /// All kinds, in catalog order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::T,
        PieceKind::L,
        PieceKind::J,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::O,
        PieceKind::I,
    ];

    /// Conventional display color for this kind. Rendering-side hint only;
    /// the simulation never reads it.
    pub fn color_name(&self) -> &'static str {
        match self {
            PieceKind::T => "purple",
            PieceKind::L => "orange",
            PieceKind::J => "blue",
            PieceKind::S => "green",
            PieceKind::Z => "red",
            PieceKind::O => "yellow",
            PieceKind::I => "cyan",
        }
    }
}

/// Cell on the board (None = empty, Some = filled with the kind that locked there)
pub type Cell = Option<PieceKind>;

/// Discrete input events forwarded by the host between ticks.
///
/// Pressed/released pairs exist for the directions because delayed
/// auto-shift needs to know hold duration; everything else is edge-triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InputEvent {
    MoveLeftPressed,
    MoveLeftReleased,
    MoveRightPressed,
    MoveRightReleased,
    RotateCw,
    RotateCcw,
    HardDrop,
    SoftDropHeld(bool),
    PauseToggle,
}

/// Session phase. Every transition site matches exhaustively on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// A piece is live and gravity/DAS/ARR advance each frame.
    Falling,
    /// Countdown after a clearing lock; no active piece, input ignored.
    LineClearFreeze(u8),
    /// Counters frozen in place; resumes exactly where it left off.
    Paused,
    /// Terminal. Gameplay input is refused, totals stay queryable.
    GameOver,
}

/// Final totals published when the session tops out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameSummary {
    pub score: u32,
    pub lines: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_kinds_distinct() {
        for (i, a) in PieceKind::ALL.iter().enumerate() {
            for b in &PieceKind::ALL[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_line_scores_table() {
        assert_eq!(LINE_SCORES, [0, 40, 100, 300, 1200]);
    }
}
