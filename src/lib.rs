//! Deterministic falling-block engine with NES-style frame timing
//!
//! This crate is the pure simulation: no I/O, no clocks, no rendering. The
//! host owns the 60 Hz loop, forwards [`InputEvent`]s between frames and
//! calls [`Game::tick`] once per frame, making it:
//!
//! - **Deterministic**: the same seed and event sequence replay identically
//! - **Testable**: every rule is exercised frame by frame in unit tests
//! - **Portable**: runs headless, in a terminal front end, or under a bot
//! - **Fast**: fixed-size board, zero allocation in the tick path
//!
//! # Module Structure
//!
//! - [`types`]: piece kinds, input events, phases and timing constants
//! - [`shapes`]: rotation-state catalog and the kick offset table
//! - [`board`]: 10x20 well with collision, locking and row compaction
//! - [`piece`]: the active piece; validated movement and kicked rotation
//! - [`rng`]: seeded LCG and the history-window kind randomizer
//! - [`scoring`]: gravity curve, line scores and level progression
//! - [`game`]: the session; gravity, DAS/ARR, freeze, spawn and scoring
//! - [`snapshot`]: per-frame read-only state for presentation layers
//!
//! # Game Rules
//!
//! Classic NES behavior rather than modern guideline play:
//!
//! - **History randomizer**: draws from a 35-entry pool, rerolling any kind
//!   seen in the last 4 draws
//! - **Simple kicks**: one fixed offset list tried in order for every kind
//! - **Frame gravity**: 48 frames per row at level 0 down to 1 frame at 29+
//! - **DAS/ARR**: 16-frame hold delay, then one shift every 6 frames
//! - **Line-clear freeze**: 20 frozen frames before rows compact
//! - **Scoring**: 40/100/300/1200 times (level + 1), +1 per soft-drop step
//!
//! # Example
//!
//! ```
//! use nestris_core::{Game, InputEvent, Phase};
//!
//! let mut game = Game::new(12345);
//!
//! // Steer, then slam the piece down. Locking is immediate.
//! game.handle_event(InputEvent::MoveRightPressed);
//! game.handle_event(InputEvent::MoveRightReleased);
//! game.handle_event(InputEvent::HardDrop);
//! assert_eq!(game.phase(), Phase::Falling);
//!
//! // Drive frames; state only advances inside tick().
//! for _ in 0..60 {
//!     game.tick();
//! }
//! let snapshot = game.snapshot();
//! assert!(snapshot.playable());
//! ```

pub mod board;
pub mod game;
pub mod piece;
pub mod rng;
pub mod scoring;
pub mod shapes;
pub mod snapshot;
pub mod types;

pub use board::Board;
pub use game::{Game, LockEvent};
pub use piece::Piece;
pub use rng::{KindRandomizer, SimpleRng};
pub use scoring::{gravity_frames, level_for_lines, line_score};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
pub use types::{
    Cell, GameSummary, InputEvent, Phase, PieceKind, ARR_FRAMES, BOARD_HEIGHT, BOARD_WIDTH,
    DAS_DELAY_FRAMES, FRAMES_PER_SECOND, LINE_CLEAR_DELAY_FRAMES, LINE_SCORES, PREVIEW_PIVOT,
    SOFT_DROP_GRAVITY_FRAMES, SPAWN_PIVOT,
};
