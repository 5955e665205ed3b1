//! Placement engine - brute-force heuristic search for the built-in AI
//!
//! The search works on a plain occupancy grid, so it can evaluate both a live
//! [`Board`](lockstep_tetris_core::Board) and a board received over the wire.
//!
//! - [`grid`]: filled/empty grid decoupled from piece colors
//! - [`search`]: candidate enumeration, validity, and scoring

pub mod grid;
pub mod search;

pub use lockstep_tetris_core as core;
pub use lockstep_tetris_types as types;

pub use grid::Occupancy;
pub use search::{
    best_placement, best_placement_for, is_valid_placement, max_rotations_of, score_placement,
    Placement,
};
