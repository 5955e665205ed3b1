//! Core game logic - pure, deterministic, and testable
//!
//! This crate holds the game rules for a single board: the piece catalog,
//! the grid, continuous gravity, locking, line clears, and leveling.
//! It has **zero dependencies** on networking, scheduling, or I/O, so the
//! same board can be driven by a real-time session, a benchmark, or a test.
//!
//! # Module Structure
//!
//! - [`board`]: width x height grid with collision checks and line clearing
//! - [`game_state`]: one board plus its falling piece, score, and lifecycle
//! - [`pieces`]: shape catalog, rotation table, and rotation compensation
//! - [`rng`]: seeded piece sequence shared by every board in a session
//! - [`scoring`]: line clear points, level progression, gravity speed
//! - [`snapshot`]: read-only views for renderers
//!
//! # Game Rules
//!
//! - **Six pieces**: straight, square, Z, reverse Z, L, reverse L
//! - **Fractional gravity**: every tick adds `0.02 + level * 0.01` rows
//! - **Two-row collision**: a piece straddles `trunc(y)` and `trunc(y) + 1`
//! - **Flat scoring**: 100 / 300 / 600 / 1000 points for 1-4 lines
//! - **Leveling**: every ten lines, up to level 10
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use lockstep_tetris_core::{BoardSettings, GameState, PieceSequence};
//! use lockstep_tetris_core::types::{GameAction, PlayerKind};
//!
//! let sequence = Arc::new(PieceSequence::generate(12345, 64));
//! let mut game = GameState::new(BoardSettings::default(), PlayerKind::Human, sequence, 0);
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::Rotate);
//! for _ in 0..10 {
//!     game.tick(0.0);
//! }
//!
//! assert!(game.y() > 0.0);
//! assert_eq!(game.score(), 0);
//! ```

pub mod board;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use lockstep_tetris_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use game_state::{BoardPhase, BoardSettings, GameState, LockOutcome, TickOutcome};
pub use pieces::{max_rotations, rotation_offset, shape_of, Piece, ShapeMatrix};
pub use rng::{PieceSequence, SimpleRng};
pub use scoring::{base_speed, line_clear_score, LevelProgress};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
