//! Scoring module - line clear points, leveling, and gravity speed
//!
//! Points are a flat table per lock (no level multiplier). Every ten cleared
//! lines raise the level by one, up to `MAX_LEVEL`; higher levels fall faster.

use crate::types::{BASE_SPEED, LINES_PER_LEVEL, LINE_SCORES, MAX_LEVEL, SPEED_PER_LEVEL};

/// Points for clearing `lines` rows in one lock
///
/// Anything outside 1-4 scores nothing.
pub fn line_clear_score(lines: usize) -> u32 {
    LINE_SCORES.get(lines).copied().unwrap_or(0)
}

/// Gravity in rows per tick for a level
pub fn base_speed(level: u32) -> f64 {
    BASE_SPEED + level as f64 * SPEED_PER_LEVEL
}

/// Level state carried by a board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelProgress {
    pub level: u32,
    /// Cleared lines counted toward the next level-up
    pub toward_next: u32,
}

impl LevelProgress {
    pub fn new(level: u32) -> Self {
        Self {
            level,
            toward_next: 0,
        }
    }

    /// Record the lines cleared by one lock
    ///
    /// At most one threshold is consumed per lock, even if the counter is
    /// still at or above `LINES_PER_LEVEL` afterwards. The counter is consumed
    /// at `MAX_LEVEL` too; only the level itself stops growing. Nothing changes
    /// once the board is over. Returns whether the level went up.
    pub fn record(&mut self, lines: u32, game_over: bool) -> bool {
        self.toward_next += lines;
        if self.toward_next < LINES_PER_LEVEL || game_over {
            return false;
        }

        self.toward_next -= LINES_PER_LEVEL;
        if self.level < MAX_LEVEL {
            self.level += 1;
            true
        } else {
            false
        }
    }
}
