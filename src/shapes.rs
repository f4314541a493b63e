//! Shape catalog - tetromino geometry and the kick table
//!
//! Each kind holds an ordered list of rotation states; a rotation state is
//! exactly 4 cell offsets relative to the piece pivot. T/L/J have 4 states,
//! S/Z/I have 2, O has 1. Process-wide constant data, never mutated.

use crate::types::PieceKind;

/// Offset of a single cell relative to the piece pivot
pub type CellOffset = (i8, i8);

/// One rotation state - 4 cell offsets from the pivot
pub type RotationState = [CellOffset; 4];

/// Pivot offsets tried, in order, when a rotation's default placement
/// collides. The first offset yielding a free placement wins; the order is
/// part of the rotation system and must not be changed.
pub const KICK_OFFSETS: [(i8, i8); 6] = [(0, 0), (-1, 0), (1, 0), (-2, 0), (2, 0), (0, -1)];

const T_STATES: [RotationState; 4] = [
    [(0, 0), (-1, 0), (1, 0), (0, -1)],
    [(0, 0), (0, -1), (0, 1), (1, 0)],
    [(0, 0), (-1, 0), (1, 0), (0, 1)],
    [(0, 0), (0, -1), (0, 1), (-1, 0)],
];

const L_STATES: [RotationState; 4] = [
    [(0, 0), (-1, 0), (1, 0), (1, -1)],
    [(0, 0), (0, -1), (0, 1), (1, 1)],
    [(0, 0), (1, 0), (-1, 0), (-1, 1)],
    [(0, 0), (0, 1), (0, -1), (-1, -1)],
];

const J_STATES: [RotationState; 4] = [
    [(0, 0), (-1, 0), (1, 0), (-1, 1)],
    [(0, 0), (0, -1), (0, 1), (-1, -1)],
    [(0, 0), (1, 0), (-1, 0), (1, 1)],
    [(0, 0), (0, 1), (0, -1), (1, -1)],
];

const S_STATES: [RotationState; 2] = [
    [(0, 0), (1, 0), (0, -1), (-1, -1)],
    [(0, 0), (-1, 0), (0, 1), (-1, -1)],
];

const Z_STATES: [RotationState; 2] = [
    [(0, 0), (-1, 0), (0, -1), (1, -1)],
    [(0, 0), (1, 0), (0, 1), (1, -1)],
];

const O_STATES: [RotationState; 1] = [[(0, 0), (1, 0), (0, 1), (1, 1)]];

const I_STATES: [RotationState; 2] = [
    [(-1, 0), (0, 0), (1, 0), (2, 0)],
    [(0, 1), (0, 0), (0, -1), (0, -2)],
];

/// Get the ordered rotation states for a piece kind
pub fn rotation_states(kind: PieceKind) -> &'static [RotationState] {
    match kind {
        PieceKind::T => &T_STATES,
        PieceKind::L => &L_STATES,
        PieceKind::J => &J_STATES,
        PieceKind::S => &S_STATES,
        PieceKind::Z => &Z_STATES,
        PieceKind::O => &O_STATES,
        PieceKind::I => &I_STATES,
    }
}

/// Number of rotation states for a piece kind
pub fn rotation_count(kind: PieceKind) -> usize {
    rotation_states(kind).len()
}

/// Absolute cell coordinates for a kind at the given rotation and pivot.
/// Pure catalog lookup plus translation.
pub fn cells_at(kind: PieceKind, rotation: usize, pivot: (i8, i8)) -> [(i8, i8); 4] {
    let state = &rotation_states(kind)[rotation];
    let mut cells = [(0i8, 0i8); 4];
    for (cell, &(dx, dy)) in cells.iter_mut().zip(state.iter()) {
        *cell = (pivot.0 + dx, pivot.1 + dy);
    }
    cells
}
