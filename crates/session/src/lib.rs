//! Session orchestration - boards, decisions, and the shared tick
//!
//! - [`config`]: [`SessionConfig`], read from the environment and validated
//! - [`decision`]: per-board decision slot and steering
//! - [`session`]: the synchronous [`Session::tick`] step plus pause/resume/end
//! - [`scheduler`]: async loop calling the step on a timer
//! - [`scores`]: in-memory high-score table filled as boards top out
//!
//! # Example
//!
//! ```
//! use lockstep_tetris_session::{Session, SessionConfig};
//! use lockstep_tetris_session::types::PlayerKind;
//!
//! let config = SessionConfig {
//!     player_one: PlayerKind::Ai,
//!     ..SessionConfig::default()
//! };
//! let mut session = Session::new(config).unwrap();
//! for _ in 0..100 {
//!     session.tick();
//! }
//! assert!(session.state(0).unwrap().y() > 0.0);
//! ```

pub mod config;
pub mod decision;
pub mod scheduler;
pub mod scores;
pub mod session;

pub use lockstep_tetris_types as types;

pub use config::{ConfigError, SessionConfig};
pub use decision::{steer, DecisionSlot, Target};
pub use scheduler::{RunSummary, Scheduler};
pub use scores::{config_label, HighScores, ScoreEntry};
pub use session::{ActionReport, AmbientCue, SeatLock, Session, TickReport};
