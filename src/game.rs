//! Game session - ties board, piece, randomizer and scoring together
//!
//! The host drives one [`Game::tick`] per fixed 60 Hz frame and forwards
//! [`InputEvent`]s between ticks. Everything else - gravity, delayed
//! auto-shift, auto-repeat, the line-clear freeze, spawning and scoring -
//! happens inside the tick, so identical seeds and event sequences replay
//! identically with no wall clock anywhere.

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::piece::Piece;
use crate::rng::KindRandomizer;
use crate::scoring::{gravity_frames, level_for_lines, line_score};
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::types::{
    GameSummary, InputEvent, Phase, PieceKind, ARR_FRAMES, DAS_DELAY_FRAMES,
    LINE_CLEAR_DELAY_FRAMES, SOFT_DROP_GRAVITY_FRAMES,
};

/// Result of a piece locking, published for observers (one per lock).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LockEvent {
    pub lines_cleared: u32,
    pub score_awarded: u32,
}

/// Directional keys currently down, plus the direction DAS charges toward.
///
/// `das_dir` follows the most recent press and is only cleared when that
/// same direction is released, so with both keys down the newer press wins
/// until it is let go.
#[derive(Debug, Clone, Copy, Default)]
struct HeldInput {
    left: bool,
    right: bool,
    soft_drop: bool,
    das_dir: i8,
}

/// Complete game session
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    current: Option<Piece>,
    next: PieceKind,
    randomizer: KindRandomizer,
    phase: Phase,
    score: u32,
    lines: u32,
    level: u32,
    held: HeldInput,
    das_counter: u32,
    arr_counter: u32,
    gravity_counter: u32,
    /// Rows detected full at lock time, compacted when the freeze ends.
    pending_rows: ArrayVec<usize, 4>,
    /// Last lock outcome (consumed by observers).
    last_event: Option<LockEvent>,
}

impl Game {
    /// Create a session and spawn the first piece.
    ///
    /// The first spawn lands on an empty board, so the session always starts
    /// in [`Phase::Falling`].
    pub fn new(seed: u32) -> Self {
        let mut randomizer = KindRandomizer::new(seed);
        let next = randomizer.next_kind();
        let mut game = Self {
            board: Board::new(),
            current: None,
            next,
            randomizer,
            phase: Phase::Falling,
            score: 0,
            lines: 0,
            level: 0,
            held: HeldInput::default(),
            das_counter: 0,
            arr_counter: 0,
            gravity_counter: 0,
            pending_rows: ArrayVec::new(),
            last_event: None,
        };
        game.spawn_piece();
        game
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current(&self) -> Option<Piece> {
        self.current
    }

    pub fn next_kind(&self) -> PieceKind {
        self.next
    }

    /// Final totals, available once the session has topped out.
    pub fn final_summary(&self) -> Option<GameSummary> {
        match self.phase {
            Phase::GameOver => Some(GameSummary {
                score: self.score,
                lines: self.lines,
            }),
            Phase::Falling | Phase::LineClearFreeze(_) | Phase::Paused => None,
        }
    }

    /// Take and clear the last lock outcome.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    /// Record one input event.
    ///
    /// Releases are honored in every phase so held state cannot wedge across
    /// a freeze or pause; presses only act while a piece is falling. A press
    /// of an already-held direction is ignored (host key repeat).
    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::MoveLeftReleased => {
                self.held.left = false;
                if self.held.das_dir == -1 {
                    self.clear_das();
                }
            }
            InputEvent::MoveRightReleased => {
                self.held.right = false;
                if self.held.das_dir == 1 {
                    self.clear_das();
                }
            }
            InputEvent::SoftDropHeld(false) => {
                self.held.soft_drop = false;
            }
            InputEvent::PauseToggle => {
                self.phase = match self.phase {
                    Phase::Falling => Phase::Paused,
                    Phase::Paused => Phase::Falling,
                    other @ (Phase::LineClearFreeze(_) | Phase::GameOver) => other,
                };
            }
            _ if self.phase != Phase::Falling => {}
            InputEvent::MoveLeftPressed => {
                if !self.held.left {
                    self.held.left = true;
                    self.held.das_dir = -1;
                    self.das_counter = 0;
                    self.move_current(-1, 0);
                }
            }
            InputEvent::MoveRightPressed => {
                if !self.held.right {
                    self.held.right = true;
                    self.held.das_dir = 1;
                    self.das_counter = 0;
                    self.move_current(1, 0);
                }
            }
            InputEvent::SoftDropHeld(true) => {
                self.held.soft_drop = true;
            }
            InputEvent::RotateCw => {
                self.rotate_current(1);
            }
            InputEvent::RotateCcw => {
                self.rotate_current(-1);
            }
            InputEvent::HardDrop => {
                if let Some(piece) = self.current.as_mut() {
                    piece.hard_drop(&self.board);
                    self.lock_current();
                }
            }
        }
    }

    /// Advance the simulation by one frame.
    ///
    /// Returns true when gameplay state changed this frame (a piece moved or
    /// locked, or frozen rows were compacted).
    pub fn tick(&mut self) -> bool {
        match self.phase {
            Phase::Paused | Phase::GameOver => false,
            Phase::LineClearFreeze(remaining) => {
                let remaining = remaining.saturating_sub(1);
                if remaining == 0 {
                    let rows = std::mem::take(&mut self.pending_rows);
                    self.board.clear_rows(&rows);
                    self.spawn_piece();
                    true
                } else {
                    self.phase = Phase::LineClearFreeze(remaining);
                    false
                }
            }
            Phase::Falling => {
                let shifted = self.step_auto_shift();
                let dropped = self.step_gravity();
                shifted || dropped
            }
        }
    }

    /// Fill a caller-owned snapshot with the state of this frame.
    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_grid(&mut out.board);
        out.active = self.current.map(ActiveSnapshot::from);
        out.next = self.next;
        out.score = self.score;
        out.lines = self.lines;
        out.level = self.level;
        out.phase = self.phase;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut snapshot = GameSnapshot::default();
        self.snapshot_into(&mut snapshot);
        snapshot
    }

    fn clear_das(&mut self) {
        self.held.das_dir = 0;
        self.das_counter = 0;
        self.arr_counter = 0;
    }

    fn move_current(&mut self, dx: i8, dy: i8) -> bool {
        match self.current.as_mut() {
            Some(piece) => piece.try_move(dx, dy, &self.board),
            None => false,
        }
    }

    fn rotate_current(&mut self, direction: i8) -> bool {
        match self.current.as_mut() {
            Some(piece) => piece.try_rotate(direction, &self.board),
            None => false,
        }
    }

    /// Delayed auto-shift: one horizontal move every ARR interval once the
    /// hold counter has exceeded the DAS delay. The initial press already
    /// moved once in `handle_event`; the ARR counter deliberately survives a
    /// re-press and only resets on release or on firing.
    fn step_auto_shift(&mut self) -> bool {
        if self.held.das_dir == 0 {
            return false;
        }
        self.das_counter += 1;
        if self.das_counter > DAS_DELAY_FRAMES {
            self.arr_counter += 1;
            if self.arr_counter >= ARR_FRAMES {
                self.arr_counter = 0;
                return self.move_current(self.held.das_dir, 0);
            }
        }
        false
    }

    /// Gravity: descend one row each time the frame counter reaches the
    /// level threshold (or the soft-drop threshold while held). A blocked
    /// descent grounds the piece and locks it this same frame. Soft-dropping
    /// scores one point per gravity step, successful or not.
    fn step_gravity(&mut self) -> bool {
        if self.current.is_none() {
            return false;
        }
        let threshold = if self.held.soft_drop {
            SOFT_DROP_GRAVITY_FRAMES
        } else {
            gravity_frames(self.level)
        };

        self.gravity_counter += 1;
        if self.gravity_counter < threshold {
            return false;
        }
        self.gravity_counter = 0;

        self.move_current(0, 1);
        if self.current.map_or(false, |piece| piece.grounded()) {
            self.lock_current();
        }
        if self.held.soft_drop {
            self.score += 1;
        }
        true
    }

    /// Transfer the current piece into the board, score any completed rows
    /// and either freeze for compaction or spawn the next piece right away.
    fn lock_current(&mut self) {
        let Some(piece) = self.current.take() else {
            debug_assert!(false, "lock with no active piece");
            return;
        };
        self.board.lock(&piece.cells(), piece.kind);

        let rows = self.board.find_full_rows();
        let cleared = rows.len();
        if cleared > 0 {
            // Score uses the level the rows were cleared on, before the
            // level itself advances.
            let awarded = line_score(cleared, self.level);
            self.score += awarded;
            self.lines += cleared as u32;
            self.level = level_for_lines(self.lines);
            self.pending_rows = rows;
            self.phase = Phase::LineClearFreeze(LINE_CLEAR_DELAY_FRAMES);
            self.last_event = Some(LockEvent {
                lines_cleared: cleared as u32,
                score_awarded: awarded,
            });
        } else {
            self.last_event = Some(LockEvent {
                lines_cleared: 0,
                score_awarded: 0,
            });
            self.spawn_piece();
        }
    }

    /// Promote the previewed kind to the live piece and draw a new preview.
    /// A colliding spawn ends the session.
    fn spawn_piece(&mut self) {
        let piece = Piece::spawn(self.next);
        if self.board.would_collide(&piece.cells()) {
            self.current = None;
            self.phase = Phase::GameOver;
            return;
        }
        self.current = Some(piece);
        self.next = self.randomizer.next_kind();
        self.phase = Phase::Falling;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BOARD_WIDTH, SPAWN_PIVOT};

    /// Replace the live piece with a known kind at a chosen pivot.
    fn force_current(game: &mut Game, kind: PieceKind, pivot: (i8, i8)) {
        let mut piece = Piece::spawn(kind);
        piece.pivot = pivot;
        game.current = Some(piece);
    }

    fn fill_row_except(game: &mut Game, y: i8, holes: &[i8]) {
        for x in 0..BOARD_WIDTH as i8 {
            if !holes.contains(&x) {
                game.board.set(x, y, Some(PieceKind::J));
            }
        }
    }

    #[test]
    fn test_new_game_starts_falling() {
        let game = Game::new(12345);
        assert_eq!(game.phase(), Phase::Falling);
        assert!(game.current().is_some());
        assert_eq!(game.score(), 0);
        assert_eq!(game.lines(), 0);
        assert_eq!(game.level(), 0);
        assert_eq!(game.current().unwrap().pivot, SPAWN_PIVOT);
    }

    #[test]
    fn test_press_moves_immediately() {
        let mut game = Game::new(12345);
        let x0 = game.current().unwrap().pivot.0;

        game.handle_event(InputEvent::MoveLeftPressed);
        assert_eq!(game.current().unwrap().pivot.0, x0 - 1);

        game.handle_event(InputEvent::MoveLeftReleased);
        game.handle_event(InputEvent::MoveRightPressed);
        assert_eq!(game.current().unwrap().pivot.0, x0);
    }

    #[test]
    fn test_repeated_press_of_held_direction_is_ignored() {
        let mut game = Game::new(12345);
        let x0 = game.current().unwrap().pivot.0;

        game.handle_event(InputEvent::MoveLeftPressed);
        game.handle_event(InputEvent::MoveLeftPressed);
        game.handle_event(InputEvent::MoveLeftPressed);
        assert_eq!(game.current().unwrap().pivot.0, x0 - 1);
    }

    #[test]
    fn test_das_fires_after_delay_then_repeats() {
        let mut game = Game::new(12345);
        force_current(&mut game, PieceKind::T, (5, 1));

        game.handle_event(InputEvent::MoveLeftPressed);
        assert_eq!(game.current().unwrap().pivot.0, 4);

        // Hold counter must exceed 16 before ARR starts counting; the first
        // auto-shift lands on the 22nd frame of the hold.
        for _ in 0..21 {
            game.tick();
        }
        assert_eq!(game.current().unwrap().pivot.0, 4);
        game.tick();
        assert_eq!(game.current().unwrap().pivot.0, 3);

        // Then one move every 6 frames.
        for _ in 0..6 {
            game.tick();
        }
        assert_eq!(game.current().unwrap().pivot.0, 2);
    }

    #[test]
    fn test_release_resets_das_and_arr() {
        let mut game = Game::new(12345);
        force_current(&mut game, PieceKind::T, (5, 1));

        game.handle_event(InputEvent::MoveLeftPressed);
        for _ in 0..22 {
            game.tick();
        }
        assert_eq!(game.current().unwrap().pivot.0, 3);

        game.handle_event(InputEvent::MoveLeftReleased);
        assert_eq!(game.das_counter, 0);
        assert_eq!(game.arr_counter, 0);
        assert_eq!(game.held.das_dir, 0);

        // No auto-shift with nothing held.
        for _ in 0..20 {
            game.tick();
        }
        assert_eq!(game.current().unwrap().pivot.0, 3);
    }

    #[test]
    fn test_newer_direction_wins_until_released() {
        let mut game = Game::new(12345);
        force_current(&mut game, PieceKind::T, (4, 1));

        game.handle_event(InputEvent::MoveLeftPressed);
        assert_eq!(game.current().unwrap().pivot.0, 3);
        game.handle_event(InputEvent::MoveRightPressed);
        assert_eq!(game.current().unwrap().pivot.0, 4);
        assert_eq!(game.held.das_dir, 1);

        // Releasing the older direction must not clear DAS for the newer.
        game.handle_event(InputEvent::MoveLeftReleased);
        assert_eq!(game.held.das_dir, 1);

        for _ in 0..22 {
            game.tick();
        }
        assert_eq!(game.current().unwrap().pivot.0, 5);
    }

    #[test]
    fn test_gravity_threshold_at_level_zero() {
        let mut game = Game::new(12345);
        let y0 = game.current().unwrap().pivot.1;

        for _ in 0..47 {
            game.tick();
        }
        assert_eq!(game.current().unwrap().pivot.1, y0);
        game.tick();
        assert_eq!(game.current().unwrap().pivot.1, y0 + 1);
    }

    #[test]
    fn test_soft_drop_descends_every_other_frame_and_scores() {
        let mut game = Game::new(12345);
        force_current(&mut game, PieceKind::T, (5, 1));
        game.handle_event(InputEvent::SoftDropHeld(true));

        game.tick();
        assert_eq!(game.current().unwrap().pivot.1, 1);
        game.tick();
        assert_eq!(game.current().unwrap().pivot.1, 2);
        assert_eq!(game.score(), 1);

        game.tick();
        game.tick();
        assert_eq!(game.current().unwrap().pivot.1, 3);
        assert_eq!(game.score(), 2);
    }

    #[test]
    fn test_soft_drop_scores_on_the_locking_frame_too() {
        let mut game = Game::new(12345);
        // Grounded from the start: T resting on the floor.
        force_current(&mut game, PieceKind::T, (5, 19));
        game.handle_event(InputEvent::SoftDropHeld(true));

        game.tick(); // counter 1 of 2
        game.tick(); // blocked descent: grounds, locks, still scores +1
        assert_eq!(game.score(), 1);
        let event = game.take_last_event().expect("lock event");
        assert_eq!(event.lines_cleared, 0);
        assert_eq!(event.score_awarded, 0);
    }

    #[test]
    fn test_lock_without_clear_spawns_same_tick() {
        let mut game = Game::new(12345);
        let next = game.next_kind();
        game.handle_event(InputEvent::HardDrop);

        assert_eq!(game.phase(), Phase::Falling);
        let current = game.current().expect("respawned piece");
        assert_eq!(current.kind, next);
        assert_eq!(current.pivot, SPAWN_PIVOT);
        assert_ne!(game.next_kind(), next); // history forbids a repeat
        assert_eq!(game.lines(), 0);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_single_line_clear_scores_and_freezes() {
        let mut game = Game::new(12345);
        fill_row_except(&mut game, 19, &[4, 5]);
        force_current(&mut game, PieceKind::O, (4, 18));

        game.handle_event(InputEvent::HardDrop);

        assert_eq!(game.score(), 40);
        assert_eq!(game.lines(), 1);
        assert_eq!(game.phase(), Phase::LineClearFreeze(20));
        assert!(game.current().is_none());
        let event = game.take_last_event().unwrap();
        assert_eq!(event.lines_cleared, 1);
        assert_eq!(event.score_awarded, 40);
    }

    #[test]
    fn test_double_line_clear_scores_by_level() {
        let mut game = Game::new(12345);
        fill_row_except(&mut game, 18, &[4, 5]);
        fill_row_except(&mut game, 19, &[4, 5]);
        force_current(&mut game, PieceKind::O, (4, 18));
        game.handle_event(InputEvent::HardDrop);
        assert_eq!(game.score(), 100);
        assert_eq!(game.lines(), 2);

        // Same clear at level 3 awards 100 * (3 + 1).
        let mut game = Game::new(12345);
        game.level = 3;
        game.lines = 30;
        fill_row_except(&mut game, 18, &[4, 5]);
        fill_row_except(&mut game, 19, &[4, 5]);
        force_current(&mut game, PieceKind::O, (4, 18));
        game.handle_event(InputEvent::HardDrop);
        assert_eq!(game.score(), 400);
        assert_eq!(game.lines(), 32);
        assert_eq!(game.level(), 3);
    }

    #[test]
    fn test_freeze_counts_twenty_frames_then_compacts() {
        let mut game = Game::new(12345);
        fill_row_except(&mut game, 19, &[4, 5]);
        force_current(&mut game, PieceKind::O, (4, 18));
        game.handle_event(InputEvent::HardDrop);
        assert_eq!(game.phase(), Phase::LineClearFreeze(20));

        // Gameplay input is dead during the freeze.
        game.handle_event(InputEvent::MoveLeftPressed);
        game.handle_event(InputEvent::RotateCw);
        game.handle_event(InputEvent::HardDrop);
        assert!(game.current().is_none());

        for frame in 0..19 {
            assert!(!game.tick(), "frame {frame} should still be frozen");
            assert!(matches!(game.phase(), Phase::LineClearFreeze(_)));
        }
        assert!(game.tick());
        assert_eq!(game.phase(), Phase::Falling);
        assert!(game.current().is_some());

        // Row 19 was cleared; the O's upper half shifted down into it.
        assert_eq!(game.board().cell(0, 19), None);
        assert_eq!(game.board().cell(9, 19), None);
        assert_eq!(game.board().cell(4, 19), Some(PieceKind::O));
        assert_eq!(game.board().cell(5, 19), Some(PieceKind::O));
    }

    #[test]
    fn test_freeze_compaction_shifts_stack_down() {
        let mut game = Game::new(12345);
        fill_row_except(&mut game, 19, &[4, 5]);
        game.board.set(0, 18, Some(PieceKind::Z));
        force_current(&mut game, PieceKind::O, (4, 18));
        game.handle_event(InputEvent::HardDrop);

        for _ in 0..20 {
            game.tick();
        }
        // The Z marker from row 18 and the upper half of the O drop to 19.
        assert_eq!(game.board().cell(0, 19), Some(PieceKind::Z));
        assert_eq!(game.board().cell(4, 19), Some(PieceKind::O));
        assert_eq!(game.board().cell(5, 19), Some(PieceKind::O));
        assert_eq!(game.board().cell(0, 18), None);
    }

    #[test]
    fn test_pause_freezes_counters_in_place() {
        let mut game = Game::new(12345);
        game.handle_event(InputEvent::MoveLeftPressed);
        for _ in 0..5 {
            game.tick();
        }
        assert_eq!(game.das_counter, 5);
        let pivot = game.current().unwrap().pivot;

        game.handle_event(InputEvent::PauseToggle);
        assert_eq!(game.phase(), Phase::Paused);
        for _ in 0..100 {
            assert!(!game.tick());
        }
        assert_eq!(game.das_counter, 5);
        assert_eq!(game.gravity_counter, 5);
        assert_eq!(game.current().unwrap().pivot, pivot);

        game.handle_event(InputEvent::PauseToggle);
        assert_eq!(game.phase(), Phase::Falling);
        game.tick();
        assert_eq!(game.das_counter, 6);
    }

    #[test]
    fn test_pause_ignores_gameplay_presses() {
        let mut game = Game::new(12345);
        let pivot = game.current().unwrap().pivot;

        game.handle_event(InputEvent::PauseToggle);
        game.handle_event(InputEvent::MoveRightPressed);
        game.handle_event(InputEvent::RotateCw);
        game.handle_event(InputEvent::HardDrop);
        assert_eq!(game.current().unwrap().pivot, pivot);
        assert_eq!(game.current().unwrap().rotation, 0);
    }

    #[test]
    fn test_release_during_pause_still_clears_held_state() {
        let mut game = Game::new(12345);
        game.handle_event(InputEvent::MoveLeftPressed);
        game.handle_event(InputEvent::PauseToggle);
        game.handle_event(InputEvent::MoveLeftReleased);
        game.handle_event(InputEvent::PauseToggle);

        // Nothing held: 30 frames produce no auto-shift.
        let x = game.current().unwrap().pivot.0;
        for _ in 0..30 {
            game.tick();
        }
        assert_eq!(game.current().unwrap().pivot.0, x);
    }

    #[test]
    fn test_spawn_collision_ends_session() {
        let mut game = Game::new(12345);
        // Occupy the spawn rows so the next spawn cannot fit.
        for x in 2..=6 {
            for y in 0..=2 {
                game.board.set(x, y, Some(PieceKind::I));
            }
        }
        let score = game.score();
        let lines = game.lines();

        game.current = None;
        game.spawn_piece();

        assert_eq!(game.phase(), Phase::GameOver);
        assert!(game.current().is_none());
        assert_eq!(
            game.final_summary(),
            Some(GameSummary { score, lines })
        );

        // Terminal state refuses gameplay input and frames do nothing.
        game.handle_event(InputEvent::HardDrop);
        game.handle_event(InputEvent::PauseToggle);
        assert_eq!(game.phase(), Phase::GameOver);
        assert!(!game.tick());
        assert_eq!(game.score(), score);
        assert_eq!(game.lines(), lines);
    }

    #[test]
    fn test_snapshot_reflects_session() {
        let mut game = Game::new(777);
        game.board.set(0, 19, Some(PieceKind::L));
        let snapshot = game.snapshot();

        assert_eq!(snapshot.board[19][0], Some(PieceKind::L));
        assert_eq!(snapshot.next, game.next_kind());
        assert_eq!(snapshot.phase, Phase::Falling);
        let active = snapshot.active.expect("active piece");
        assert_eq!(active.kind, game.current().unwrap().kind);
        assert_eq!(active.cells, game.current().unwrap().cells());
    }

    #[test]
    fn test_level_advances_with_lines() {
        let mut game = Game::new(12345);
        game.lines = 9;
        fill_row_except(&mut game, 19, &[4, 5]);
        force_current(&mut game, PieceKind::O, (4, 18));
        game.handle_event(InputEvent::HardDrop);

        assert_eq!(game.lines(), 10);
        assert_eq!(game.level(), 1);
        // Scored on the level in effect before the clear.
        assert_eq!(game.score(), 40);
    }
}
