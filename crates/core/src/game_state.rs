//! Game state module - one player's board and falling piece
//!
//! This module ties together the board, the piece catalog, the shared piece
//! sequence, and scoring. It handles continuous gravity, movement, rotation,
//! locking, line clears, and the per-board lifecycle:
//!
//! ```text
//! Spawning -> Falling -> Locking -> Spawning
//!                |  ^
//!                v  |         Spawning -> GameOver (spawn position blocked)
//!               Paused
//! ```
//!
//! The row of a piece is fractional: gravity adds a small amount every tick
//! and collision checks look at the two rows the piece straddles.

use std::sync::Arc;

use crate::pieces::{rotation_offset, Piece};
use crate::rng::PieceSequence;
use crate::scoring::{base_speed, line_clear_score, LevelProgress};
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::types::*;
use crate::Board;

/// Board dimensions and starting level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardSettings {
    pub width: usize,
    pub height: usize,
    pub start_level: u32,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_FIELD_WIDTH as usize,
            height: DEFAULT_FIELD_HEIGHT as usize,
            start_level: DEFAULT_START_LEVEL,
        }
    }
}

/// Where a board is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardPhase {
    Falling,
    Paused,
    GameOver,
}

/// What a lock did to the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockOutcome {
    pub lines_cleared: u32,
    pub score_delta: u32,
    pub leveled_up: bool,
    /// The follow-up spawn was blocked
    pub game_over: bool,
}

/// Result of a gravity step or soft drop
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Board is paused or over
    Idle,
    /// Piece descended
    Moved,
    /// Piece could not descend and was locked
    Locked(LockOutcome),
}

impl TickOutcome {
    pub fn locked(&self) -> Option<LockOutcome> {
        match self {
            TickOutcome::Locked(outcome) => Some(*outcome),
            _ => None,
        }
    }
}

/// Complete state of one board
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    sequence: Arc<PieceSequence>,
    active: Piece,
    x: i32,
    y: f64,
    /// Cursor into the shared sequence; the next spawn uses this index
    piece_index: usize,
    /// Increments on every spawn
    piece_serial: u64,
    score: u32,
    lines: u32,
    progress: LevelProgress,
    paused: bool,
    game_over: bool,
    player_kind: PlayerKind,
    disconnected: bool,
}

impl GameState {
    /// Create a board and spawn its first piece from `sequence[start_index]`
    pub fn new(
        settings: BoardSettings,
        player_kind: PlayerKind,
        sequence: Arc<PieceSequence>,
        start_index: usize,
    ) -> Self {
        let active = Piece::new(sequence.get(start_index));
        let mut state = Self {
            board: Board::new(settings.width, settings.height),
            sequence,
            active,
            x: 0,
            y: 0.0,
            piece_index: start_index,
            piece_serial: 0,
            score: 0,
            lines: 0,
            progress: LevelProgress::new(settings.start_level.clamp(1, MAX_LEVEL)),
            paused: false,
            game_over: false,
            player_kind,
            disconnected: false,
        };
        state.spawn();
        state
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable board access for fixtures and replays
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn active(&self) -> Piece {
        self.active
    }

    /// Replace the falling piece (fixtures and replays)
    pub fn set_active(&mut self, piece: Piece) {
        self.active = piece;
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Move the falling piece without any checks (fixtures and replays)
    pub fn set_position(&mut self, x: i32, y: f64) {
        self.x = x;
        self.y = y;
    }

    /// Kind of the piece that spawns next
    pub fn next_piece(&self) -> PieceKind {
        self.sequence.get(self.piece_index)
    }

    pub fn piece_index(&self) -> usize {
        self.piece_index
    }

    pub fn piece_serial(&self) -> u64 {
        self.piece_serial
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        self.progress.level
    }

    pub fn lines_toward_level(&self) -> u32 {
        self.progress.toward_next
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn player_kind(&self) -> PlayerKind {
        self.player_kind
    }

    pub fn disconnected(&self) -> bool {
        self.disconnected
    }

    pub fn set_disconnected(&mut self, disconnected: bool) {
        self.disconnected = disconnected;
    }

    pub fn is_playable(&self) -> bool {
        !self.paused && !self.game_over
    }

    pub fn phase(&self) -> BoardPhase {
        if self.game_over {
            BoardPhase::GameOver
        } else if self.paused {
            BoardPhase::Paused
        } else {
            BoardPhase::Falling
        }
    }

    /// Spawn the next piece from the shared sequence
    ///
    /// The piece is centered at the top. Returns false (and ends the game) if
    /// the spawn position is already blocked.
    pub fn spawn(&mut self) -> bool {
        self.active = Piece::new(self.sequence.get(self.piece_index));
        self.piece_index += 1;
        self.piece_serial += 1;
        self.x = (self.board.width() / 2) as i32 - (self.active.width() / 2) as i32;
        self.y = 0.0;

        if !self.is_valid_position(self.x, self.y) {
            self.game_over = true;
            return false;
        }
        true
    }

    /// Whether every filled cell of the active piece is free at `(x, row)`
    fn fits(&self, x: i32, row: i32) -> bool {
        self.active
            .cells()
            .filled_cells()
            .all(|(r, c)| self.board.is_valid(x + c as i32, row + r as i32))
    }

    /// Check the active piece at column `x`, fractional row `y`
    ///
    /// The piece straddles rows `trunc(y)` and `trunc(y) + 1`, and both are
    /// checked. For a lateral check (`x` differs from the current column) a
    /// piece that is blocked at `trunc(y)` but free at `trunc(y) + 1` is
    /// accepted, and the current row snaps to `trunc(y) + 1` as a side effect.
    pub fn is_valid_position(&mut self, x: i32, y: f64) -> bool {
        let row = y as i32;

        if x != self.x {
            return match (self.fits(x, row), self.fits(x, row + 1)) {
                (true, true) => true,
                (false, true) => {
                    self.y = (row + 1) as f64;
                    true
                }
                _ => false,
            };
        }

        self.fits(x, row) && self.fits(x, row + 1)
    }

    /// Write the active piece into the board, clear full rows, then spawn
    pub fn lock_and_clear(&mut self) -> LockOutcome {
        let row = self.y as i32;
        let kind = self.active.kind;
        for (r, c) in self.active.cells().filled_cells() {
            // Cells outside the grid are dropped.
            self.board
                .set(self.x + c as i32, row + r as i32, Some(kind));
        }

        let cleared = self.board.clear_full_rows();
        let score_delta = line_clear_score(cleared);
        self.lines += cleared as u32;
        self.score += score_delta;
        let leveled_up = self.progress.record(cleared as u32, self.game_over);

        self.spawn();

        LockOutcome {
            lines_cleared: cleared as u32,
            score_delta,
            leveled_up,
            game_over: self.game_over,
        }
    }

    /// Rotate the active piece one step
    ///
    /// The position is compensated per kind before the rotated shape is
    /// checked. On failure piece, rotation and position are all restored.
    pub fn rotate(&mut self) -> bool {
        let (dx, dy) = rotation_offset(self.active.kind, self.active.rotation);
        let new_x = self.x + dx;
        let new_y = self.y + dy as f64;
        let previous = (self.active, self.x, self.y);

        self.active = self.active.rotated();
        if self.is_valid_position(new_x, new_y) {
            self.x = new_x;
            self.y = new_y;
            true
        } else {
            (self.active, self.x, self.y) = previous;
            false
        }
    }

    /// Move the active piece `dx` columns (honours the lateral snap)
    pub fn shift(&mut self, dx: i32) -> bool {
        let new_x = self.x + dx;
        if self.is_valid_position(new_x, self.y) {
            self.x = new_x;
            true
        } else {
            false
        }
    }

    /// Push the piece half a row down, locking it if that is blocked
    pub fn soft_drop(&mut self) -> TickOutcome {
        self.descend(SOFT_DROP_STEP)
    }

    /// Advance gravity by one tick plus `assist` extra rows
    ///
    /// An overshooting step is committed and then absorbed by the lock.
    pub fn tick(&mut self, assist: f64) -> TickOutcome {
        self.descend(base_speed(self.level()) + assist)
    }

    fn descend(&mut self, dy: f64) -> TickOutcome {
        if !self.is_playable() {
            return TickOutcome::Idle;
        }

        let new_y = self.y + dy;
        let valid = self.is_valid_position(self.x, new_y);
        self.y = new_y;
        if valid {
            TickOutcome::Moved
        } else {
            TickOutcome::Locked(self.lock_and_clear())
        }
    }

    /// Apply a key-press intent
    ///
    /// Returns false when the intent was rejected.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::Pause => self.toggle_pause(),
            _ if !self.is_playable() => false,
            GameAction::MoveLeft => self.shift(-1),
            GameAction::MoveRight => self.shift(1),
            GameAction::Rotate => self.rotate(),
            GameAction::SoftDrop => !matches!(self.soft_drop(), TickOutcome::Idle),
        }
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume unless the game is over
    pub fn resume(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        self.paused = false;
        true
    }

    /// Toggle pause; ended boards stay paused
    pub fn toggle_pause(&mut self) -> bool {
        if self.paused {
            self.resume()
        } else {
            self.pause();
            true
        }
    }

    /// End the game on this board
    pub fn end(&mut self) {
        self.game_over = true;
        self.paused = true;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let next = self.next_piece();
        GameSnapshot {
            width: self.board.width(),
            height: self.board.height(),
            occupancy: self.board.occupancy(),
            colors: self.board.colors(),
            active: ActiveSnapshot {
                kind: self.active.kind,
                rotation: self.active.rotation,
                x: self.x,
                y: self.y,
                cells: *self.active.cells(),
            },
            next,
            next_cells: *Piece::new(next).cells(),
            score: self.score,
            lines: self.lines,
            level: self.level(),
            paused: self.paused,
            game_over: self.game_over,
            disconnected: self.disconnected,
            player_kind: self.player_kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(width: usize, height: usize, pieces: Vec<PieceKind>) -> GameState {
        GameState::new(
            BoardSettings {
                width,
                height,
                start_level: 1,
            },
            PlayerKind::Human,
            Arc::new(PieceSequence::from_pieces(pieces)),
            0,
        )
    }

    fn fill(state: &mut GameState, rows: &[&str]) {
        let top = state.board().height() - rows.len();
        for (i, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch != '.' {
                    state
                        .board_mut()
                        .set(x as i32, (top + i) as i32, Some(PieceKind::Square));
                }
            }
        }
    }

    #[test]
    fn spawn_centers_piece_and_advances_index() {
        let state = state_with(10, 20, vec![PieceKind::Straight, PieceKind::Z]);
        assert_eq!(state.active(), Piece::new(PieceKind::Straight));
        assert_eq!(state.x(), 3);
        assert_eq!(state.y(), 0.0);
        assert_eq!(state.piece_index(), 1);
        assert_eq!(state.next_piece(), PieceKind::Z);
        assert_eq!(state.phase(), BoardPhase::Falling);
    }

    #[test]
    fn blocked_spawn_ends_game() {
        let mut state = state_with(4, 6, vec![PieceKind::Straight]);
        state.board_mut().set(2, 1, Some(PieceKind::Z));
        assert!(!state.spawn());
        assert!(state.game_over());
        assert_eq!(state.phase(), BoardPhase::GameOver);
        assert_eq!(state.tick(0.0), TickOutcome::Idle);
    }

    #[test]
    fn lateral_check_snaps_down_one_row() {
        let mut state = state_with(10, 20, vec![PieceKind::Square]);
        state.set_position(4, 5.4);
        state.board_mut().set(6, 5, Some(PieceKind::Z));

        assert!(state.is_valid_position(5, 5.4));
        assert_eq!(state.y(), 6.0);
        assert_eq!(state.x(), 4);
    }

    #[test]
    fn lateral_check_rejects_when_both_rows_blocked() {
        let mut state = state_with(10, 20, vec![PieceKind::Square]);
        state.set_position(4, 5.4);
        state.board_mut().set(6, 5, Some(PieceKind::Z));
        state.board_mut().set(6, 7, Some(PieceKind::Z));

        assert!(!state.is_valid_position(5, 5.4));
        assert_eq!(state.y(), 5.4);
    }

    #[test]
    fn vertical_check_has_no_side_effect() {
        let mut state = state_with(10, 20, vec![PieceKind::Square]);
        state.set_position(4, 5.4);
        state.board_mut().set(4, 5, Some(PieceKind::Z));

        assert!(!state.is_valid_position(4, 5.4));
        assert_eq!(state.y(), 5.4);

        state.board_mut().set(4, 5, None);
        assert!(state.is_valid_position(4, 5.4));
        assert_eq!(state.y(), 5.4);
    }

    #[test]
    fn shift_moves_and_respects_walls() {
        let mut state = state_with(10, 20, vec![PieceKind::Square]);
        assert_eq!(state.x(), 4);
        assert!(state.apply_action(GameAction::MoveLeft));
        assert_eq!(state.x(), 3);

        state.set_position(8, 3.0);
        assert!(!state.apply_action(GameAction::MoveRight));
        assert_eq!(state.x(), 8);
    }

    #[test]
    fn square_rotation_keeps_cells() {
        let mut state = state_with(10, 20, vec![PieceKind::Square]);
        state.set_position(4, 5.0);
        let cells = *state.active().cells();
        for i in 1..=4u8 {
            assert!(state.rotate());
            assert_eq!(*state.active().cells(), cells);
            assert_eq!(state.active().rotation, i % 4);
            assert_eq!((state.x(), state.y()), (4, 5.0));
        }
    }

    #[test]
    fn rotation_applies_compensation() {
        let mut state = state_with(10, 20, vec![PieceKind::L]);
        state.set_position(4, 5.0);
        assert!(state.rotate());
        assert_eq!(state.active(), Piece { kind: PieceKind::L, rotation: 1 });
        assert_eq!((state.x(), state.y()), (3, 5.0));
    }

    #[test]
    fn failed_rotation_rolls_back_everything() {
        let mut state = state_with(10, 20, vec![PieceKind::L]);
        state.set_position(0, 5.0);
        let before = (state.active(), state.x(), state.y());

        assert!(!state.rotate());
        assert_eq!((state.active(), state.x(), state.y()), before);
    }

    #[test]
    fn lock_clears_one_row_and_shifts() {
        let mut state = state_with(4, 6, vec![PieceKind::Straight]);
        fill(&mut state, &["..#.", "....", "...."]);
        state.set_position(0, 5.0);

        let outcome = state.lock_and_clear();
        assert_eq!(outcome.lines_cleared, 1);
        assert_eq!(outcome.score_delta, 100);
        assert_eq!(state.lines(), 1);
        assert_eq!(
            *state.board(),
            Board::from_ascii(&["....", "....", "....", "....", "..#.", "...."])
        );
    }

    #[test]
    fn score_per_clear_count() {
        for n in 0..=4usize {
            let mut state = state_with(4, 6, vec![PieceKind::Straight]);
            let rows = vec![".###"; n];
            fill(&mut state, &rows);
            state.set_active(Piece {
                kind: PieceKind::Straight,
                rotation: 1,
            });
            state.set_position(0, 2.0);

            let outcome = state.lock_and_clear();
            assert_eq!(outcome.lines_cleared, n as u32);
            assert_eq!(state.score(), [0, 100, 300, 600, 1000][n]);
        }
    }

    #[test]
    fn soft_drop_locks_when_blocked() {
        let mut state = state_with(4, 6, vec![PieceKind::Straight]);
        state.set_position(0, 4.6);

        assert_eq!(state.soft_drop(), TickOutcome::Locked(LockOutcome {
            lines_cleared: 1,
            score_delta: 100,
            leveled_up: false,
            game_over: false,
        }));
        assert_eq!(state.piece_serial(), 2);
    }

    #[test]
    fn paused_board_ignores_moves() {
        let mut state = state_with(10, 20, vec![PieceKind::Z]);
        assert!(state.apply_action(GameAction::Pause));
        assert!(state.paused());
        assert!(!state.apply_action(GameAction::MoveLeft));
        assert_eq!(state.tick(0.0), TickOutcome::Idle);
        assert!(state.apply_action(GameAction::Pause));
        assert!(!state.paused());
    }

    #[test]
    fn ended_board_cannot_resume() {
        let mut state = state_with(10, 20, vec![PieceKind::Z]);
        state.end();
        assert!(!state.resume());
        assert_eq!(state.phase(), BoardPhase::GameOver);
    }
}
