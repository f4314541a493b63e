//! Piece module - the active falling piece
//!
//! A piece is a kind, a rotation index into the shape catalog and a pivot.
//! Movement and rotation validate candidate placements against the board and
//! commit only on success. A failed downward move additionally raises the
//! `grounded` flag, which the frame machine consumes to trigger a lock; the
//! board itself is never mutated here.

use crate::board::Board;
use crate::shapes::{cells_at, rotation_count, KICK_OFFSETS};
use crate::types::{PieceKind, SPAWN_PIVOT};

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    /// Index into the kind's rotation-state list.
    pub rotation: usize,
    /// May sit transiently above the top row during kicks and spawn checks.
    pub pivot: (i8, i8),
    grounded: bool,
}

impl Piece {
    /// Create a piece at the spawn pivot in its first rotation state.
    pub fn spawn(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: 0,
            pivot: SPAWN_PIVOT,
            grounded: false,
        }
    }

    /// The 4 absolute cell coordinates at the current rotation and pivot.
    pub fn cells(&self) -> [(i8, i8); 4] {
        cells_at(self.kind, self.rotation, self.pivot)
    }

    /// Whether a downward move has failed, i.e. the piece is resting.
    pub fn grounded(&self) -> bool {
        self.grounded
    }

    /// Try to translate the piece by (dx, dy).
    ///
    /// On collision nothing moves and false is returned; if the blocked move
    /// was downward the piece becomes grounded.
    pub fn try_move(&mut self, dx: i8, dy: i8, board: &Board) -> bool {
        let pivot = (self.pivot.0 + dx, self.pivot.1 + dy);
        if board.would_collide(&cells_at(self.kind, self.rotation, pivot)) {
            if dy > 0 {
                self.grounded = true;
            }
            return false;
        }
        self.pivot = pivot;
        true
    }

    /// Try to rotate by direction (+1 = clockwise, -1 = counter-clockwise),
    /// probing the kick offsets in their fixed order.
    ///
    /// The first offset with a free placement commits rotation and pivot
    /// together; if all fail the piece is unchanged.
    pub fn try_rotate(&mut self, direction: i8, board: &Board) -> bool {
        let count = rotation_count(self.kind) as i8;
        let rotation = (self.rotation as i8 + direction).rem_euclid(count) as usize;

        for &(dx, dy) in KICK_OFFSETS.iter() {
            let pivot = (self.pivot.0 + dx, self.pivot.1 + dy);
            if !board.would_collide(&cells_at(self.kind, rotation, pivot)) {
                self.rotation = rotation;
                self.pivot = pivot;
                return true;
            }
        }
        false
    }

    /// Drop straight down to the resting position and ground the piece.
    ///
    /// Rows grow monotonically and anything at or past the floor collides,
    /// so this terminates within the board height.
    pub fn hard_drop(&mut self, board: &Board) {
        while self.try_move(0, 1, board) {}
    }
}
