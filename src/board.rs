//! Board module - the occupancy grid
//!
//! A 10x20 grid where each cell is empty or tagged with the kind that locked
//! there. Flat array storage, row-major, for cache locality and
//! zero-allocation queries.
//!
//! Collision with walls, floor and settled blocks is unified through
//! [`Board::is_occupied`]: anything left of column 0, right of column 9 or
//! below row 19 counts as occupied. Rows above the top (y < 0) are free so
//! pieces can sit there transiently during kicks and spawn checks.

use arrayvec::ArrayVec;

use crate::types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    /// Get the cell at (x, y). Empty for any coordinate outside the grid.
    pub fn cell(&self, x: i8, y: i8) -> Cell {
        Self::index(x, y).and_then(|idx| self.cells[idx])
    }

    /// Set the cell at (x, y). Returns false if outside the grid.
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Whether (x, y) blocks a piece.
    ///
    /// True for marked cells and for anything beyond the side walls or the
    /// floor. Coordinates above the top row are free: kicked and freshly
    /// spawned pieces probe there.
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        if x < 0 || x >= BOARD_WIDTH as i8 || y >= BOARD_HEIGHT as i8 {
            return true;
        }
        if y < 0 {
            return false;
        }
        self.cells[(y as usize) * (BOARD_WIDTH as usize) + (x as usize)].is_some()
    }

    /// True if any of the cells is occupied per [`Board::is_occupied`].
    pub fn would_collide(&self, cells: &[(i8, i8)]) -> bool {
        cells.iter().any(|&(x, y)| self.is_occupied(x, y))
    }

    /// Mark each cell occupied with the piece's kind tag.
    ///
    /// Locking colliding cells is a sequencing bug in the caller, not a
    /// runtime condition. Cells above the top row fall outside the grid and
    /// are dropped.
    pub fn lock(&mut self, cells: &[(i8, i8)], kind: PieceKind) {
        debug_assert!(
            !self.would_collide(cells),
            "locking colliding cells: {cells:?}"
        );
        for &(x, y) in cells {
            self.set(x, y, Some(kind));
        }
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= BOARD_HEIGHT as usize {
            return false;
        }
        let start = y * BOARD_WIDTH as usize;
        let end = start + BOARD_WIDTH as usize;
        self.cells[start..end].iter().all(|cell| cell.is_some())
    }

    /// Row indices where all 10 columns are occupied, ascending.
    ///
    /// A single lock adds 4 cells, so at most 4 rows can complete at once;
    /// callers invoke this right after a lock.
    pub fn find_full_rows(&self) -> ArrayVec<usize, 4> {
        let mut rows = ArrayVec::new();
        for y in 0..BOARD_HEIGHT as usize {
            if self.is_row_full(y) {
                rows.push(y);
            }
        }
        rows
    }

    /// Remove the listed rows and compact the remainder in one pass.
    ///
    /// Every occupied cell above a cleared row shifts down by the number of
    /// cleared rows beneath it, applied for the whole batch atomically
    /// rather than row-by-row.
    pub fn clear_rows(&mut self, rows: &[usize]) {
        if rows.is_empty() {
            return;
        }
        let width = BOARD_WIDTH as usize;
        let mut write = BOARD_HEIGHT as usize;

        // Walk bottom to top, sliding every surviving row down to the next
        // free slot. copy_within handles the overlapping ranges.
        for read in (0..BOARD_HEIGHT as usize).rev() {
            if rows.contains(&read) {
                continue;
            }
            write -= 1;
            if write != read {
                let src = read * width;
                self.cells.copy_within(src..src + width, write * width);
            }
        }

        // One empty row enters at the top per cleared row.
        for cell in &mut self.cells[..write * width] {
            *cell = None;
        }
    }

    /// Copy the grid into a 2D array (used for published snapshots).
    pub fn write_grid(&self, out: &mut [[Cell; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize]) {
        let width = BOARD_WIDTH as usize;
        for (y, row) in out.iter_mut().enumerate() {
            let start = y * width;
            row.copy_from_slice(&self.cells[start..start + width]);
        }
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
