//! Read-only state published to rendering/audio collaborators once per tick.

use crate::piece::Piece;
use crate::types::{Cell, Phase, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    /// Absolute cell coordinates; cells above the top row have y < 0.
    pub cells: [(i8, i8); 4],
}

impl From<Piece> for ActiveSnapshot {
    fn from(piece: Piece) -> Self {
        Self {
            kind: piece.kind,
            cells: piece.cells(),
        }
    }
}

/// Everything a presentation layer needs for one frame. Owned by the caller
/// and refilled in place each tick; holds no reference into the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameSnapshot {
    pub board: [[Cell; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
    pub active: Option<ActiveSnapshot>,
    pub next: PieceKind,
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    pub phase: Phase,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        matches!(self.phase, Phase::Falling)
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[None; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            active: None,
            next: PieceKind::T,
            score: 0,
            lines: 0,
            level: 0,
            phase: Phase::Falling,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_snapshot_is_empty() {
        let snapshot = GameSnapshot::default();
        assert!(snapshot.board.iter().flatten().all(|c| c.is_none()));
        assert!(snapshot.active.is_none());
        assert!(snapshot.playable());
    }

    #[test]
    fn test_active_snapshot_from_piece() {
        let piece = Piece::spawn(PieceKind::I);
        let snap = ActiveSnapshot::from(piece);
        assert_eq!(snap.kind, PieceKind::I);
        assert_eq!(snap.cells, piece.cells());
    }
}
