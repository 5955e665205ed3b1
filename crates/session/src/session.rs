//! Session - one or two boards advanced by a shared tick
//!
//! The session owns the boards, the piece sequence they share, and a decision
//! slot per board. [`Session::tick`] is a plain synchronous step; the
//! [`Scheduler`](crate::Scheduler) calls it on a timer, tests call it
//! directly.

use std::sync::Arc;

use arrayvec::ArrayVec;
use tokio::runtime::Handle;
use tracing::{debug, info};

use lockstep_tetris_adapter::MoveClient;
use lockstep_tetris_core::{GameSnapshot, GameState, LockOutcome, PieceSequence, TickOutcome};

use crate::config::{ConfigError, SessionConfig};
use crate::decision::{steer, DecisionSlot, Target};
use crate::scores::{config_label, HighScores};
use crate::types::{GameAction, PlayerKind, PIECE_SEQUENCE_LEN};

/// Session-wide background cue (music, animation) to start or stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmbientCue {
    Pause,
    Play,
}

/// A lock that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatLock {
    pub seat: usize,
    pub outcome: LockOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    pub locks: ArrayVec<SeatLock, 2>,
    pub cue: Option<AmbientCue>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionReport {
    pub applied: bool,
    pub cue: Option<AmbientCue>,
}

#[derive(Debug)]
struct Seat {
    state: GameState,
    decision: DecisionSlot,
}

pub struct Session {
    config: SessionConfig,
    sequence: Arc<PieceSequence>,
    seats: ArrayVec<Seat, 2>,
    /// Sequence index the current game started at
    start_index: usize,
    client: MoveClient,
    runtime: Option<Handle>,
    ticks: u64,
    scores: HighScores,
}

impl Session {
    /// Create a session on the current tokio runtime, if there is one
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        Self::with_handle(config, Handle::try_current().ok())
    }

    /// Create a session that spawns external decisions on `runtime`
    pub fn with_handle(config: SessionConfig, runtime: Option<Handle>) -> Result<Self, ConfigError> {
        config.validate()?;

        let sequence = Arc::new(PieceSequence::generate(config.seed, PIECE_SEQUENCE_LEN));
        let client = MoveClient::new(config.external.clone());
        let mut session = Self {
            config,
            sequence,
            seats: ArrayVec::new(),
            start_index: 0,
            client,
            runtime,
            ticks: 0,
            scores: HighScores::new(),
        };
        session.start_game();
        Ok(session)
    }

    fn start_game(&mut self) {
        let settings = self.config.board_settings();
        self.seats = self
            .config
            .seats()
            .into_iter()
            .map(|kind| Seat {
                state: GameState::new(settings, kind, Arc::clone(&self.sequence), self.start_index),
                decision: DecisionSlot::new(),
            })
            .collect();

        info!(
            boards = self.seats.len(),
            start_index = self.start_index,
            seed = self.sequence.seed(),
            "game started"
        );
        for seat in 0..self.seats.len() {
            self.dispatch(seat);
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn board_count(&self) -> usize {
        self.seats.len()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn start_index(&self) -> usize {
        self.start_index
    }

    pub fn state(&self, seat: usize) -> Option<&GameState> {
        self.seats.get(seat).map(|s| &s.state)
    }

    /// Mutable board access for fixtures and replays
    pub fn state_mut(&mut self, seat: usize) -> Option<&mut GameState> {
        self.seats.get_mut(seat).map(|s| &mut s.state)
    }

    pub fn snapshot(&self, seat: usize) -> Option<GameSnapshot> {
        self.state(seat).map(GameState::snapshot)
    }

    pub fn snapshots(&self) -> Vec<GameSnapshot> {
        self.seats.iter().map(|s| s.state.snapshot()).collect()
    }

    /// Decided target for the current piece on `seat`
    pub fn target(&self, seat: usize) -> Option<Target> {
        let s = self.seats.get(seat)?;
        s.decision.target_for(s.state.piece_serial())
    }

    /// Whether `seat` is waiting on the move service
    pub fn decision_pending(&self, seat: usize) -> bool {
        self.seats.get(seat).is_some_and(|s| s.decision.is_pending())
    }

    /// True while at least one board is still running
    pub fn ambient_active(&self) -> bool {
        self.seats.iter().any(|s| s.state.is_playable())
    }

    pub fn is_over(&self) -> bool {
        self.seats.iter().all(|s| s.state.game_over())
    }

    /// Make sure the current piece on `seat` has (or is getting) a decision
    fn dispatch(&mut self, seat: usize) {
        let Some(s) = self.seats.get_mut(seat) else {
            return;
        };
        if !s.state.is_playable() {
            return;
        }

        match s.state.player_kind() {
            PlayerKind::Human => {}
            PlayerKind::Ai => s.decision.decide_ai(&s.state),
            PlayerKind::External => {
                s.decision.poll(&mut s.state);
                s.decision
                    .request_external(&mut s.state, &self.client, self.runtime.as_ref());
            }
        }
    }

    /// Advance every running board by one tick
    pub fn tick(&mut self) -> TickReport {
        let was_active = self.ambient_active();
        self.ticks += 1;
        let mut report = TickReport {
            tick: self.ticks,
            ..TickReport::default()
        };

        for seat in 0..self.seats.len() {
            self.dispatch(seat);

            let s = &mut self.seats[seat];
            if !s.state.is_playable() {
                continue;
            }

            let assist = match s.decision.target_for(s.state.piece_serial()) {
                Some(target) if s.state.player_kind().is_steered() => steer(&mut s.state, target),
                _ => 0.0,
            };

            if let TickOutcome::Locked(outcome) = s.state.tick(assist) {
                debug!(
                    seat,
                    lines = outcome.lines_cleared,
                    score = s.state.score(),
                    level = s.state.level(),
                    "piece locked"
                );
                report.locks.push(SeatLock { seat, outcome });
                if outcome.game_over {
                    self.finish(seat);
                } else {
                    self.dispatch(seat);
                }
            }
        }

        report.cue = self.cue_since(was_active);
        report
    }

    /// Board `seat` just topped out: drop its decision and record the score
    fn finish(&mut self, seat: usize) {
        let Some(s) = self.seats.get_mut(seat) else {
            return;
        };
        s.decision.clear();
        let (score, level, kind) = (s.state.score(), s.state.level(), s.state.player_kind());
        info!(seat, score, lines = s.state.lines(), "game over");

        let label = config_label(
            self.config.width,
            self.config.height,
            level,
            kind,
            self.config.extend_mode,
        );
        let name = self.scores.record(&format!("Player{}", seat + 1), &label, score);
        debug!(seat, name = %name, config = %label, "score recorded");
    }

    /// Scores of every board that topped out in this session
    pub fn high_scores(&self) -> &HighScores {
        &self.scores
    }

    fn cue_since(&self, was_active: bool) -> Option<AmbientCue> {
        match (was_active, self.ambient_active()) {
            (true, false) => Some(AmbientCue::Pause),
            (false, true) => Some(AmbientCue::Play),
            _ => None,
        }
    }

    /// Apply a key-press intent to a human board
    ///
    /// Steered boards only accept `Pause`.
    pub fn apply_action(&mut self, seat: usize, action: GameAction) -> ActionReport {
        if action == GameAction::Pause {
            return self.toggle_pause(seat);
        }

        let was_active = self.ambient_active();
        let Some(s) = self.seats.get_mut(seat) else {
            return ActionReport::default();
        };
        if s.state.player_kind().is_steered() {
            return ActionReport::default();
        }

        let applied = s.state.apply_action(action);
        if applied && s.state.game_over() {
            self.finish(seat);
        }
        ActionReport {
            applied,
            cue: self.cue_since(was_active),
        }
    }

    pub fn pause(&mut self, seat: usize) -> Option<AmbientCue> {
        let was_active = self.ambient_active();
        let s = self.seats.get_mut(seat)?;
        s.state.pause();
        s.decision.cancel();
        debug!(seat, "paused");
        self.cue_since(was_active)
    }

    pub fn resume(&mut self, seat: usize) -> Option<AmbientCue> {
        let was_active = self.ambient_active();
        let s = self.seats.get_mut(seat)?;
        if !s.state.resume() {
            return None;
        }
        debug!(seat, "resumed");
        self.dispatch(seat);
        self.cue_since(was_active)
    }

    pub fn toggle_pause(&mut self, seat: usize) -> ActionReport {
        let Some(s) = self.seats.get(seat) else {
            return ActionReport::default();
        };
        let (applied, cue) = if s.state.paused() {
            let applied = !s.state.game_over();
            (applied, self.resume(seat))
        } else {
            (true, self.pause(seat))
        };
        ActionReport { applied, cue }
    }

    /// End the game on one board
    pub fn end(&mut self, seat: usize) -> Option<AmbientCue> {
        let was_active = self.ambient_active();
        let s = self.seats.get_mut(seat)?;
        s.state.end();
        s.decision.clear();
        info!(seat, score = s.state.score(), "game ended");
        self.cue_since(was_active)
    }

    /// Start a fresh game on every board
    ///
    /// All boards start one piece past the first board's sequence cursor, so
    /// the new game never replays the old one and two-board games stay in step.
    pub fn restart(&mut self) -> Option<AmbientCue> {
        let was_active = self.ambient_active();
        if let Some(first) = self.seats.first() {
            self.start_index = first.state.piece_index() + 1;
        }
        self.ticks = 0;
        self.start_game();
        self.cue_since(was_active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(p1: PlayerKind, p2: Option<PlayerKind>) -> Session {
        Session::with_handle(
            SessionConfig {
                player_one: p1,
                player_two: p2.unwrap_or_default(),
                extend_mode: p2.is_some(),
                ..SessionConfig::default()
            },
            None,
        )
        .unwrap()
    }

    #[test]
    fn boards_share_the_sequence() {
        let s = session(PlayerKind::Human, Some(PlayerKind::Human));
        assert_eq!(s.board_count(), 2);
        let (a, b) = (s.state(0).unwrap(), s.state(1).unwrap());
        assert_eq!(a.active(), b.active());
        assert_eq!(a.next_piece(), b.next_piece());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SessionConfig {
            width: 2,
            ..SessionConfig::default()
        };
        assert!(matches!(
            Session::with_handle(config, None),
            Err(ConfigError::Width { width: 2 })
        ));
    }

    #[test]
    fn tick_moves_every_running_board() {
        let mut s = session(PlayerKind::Human, Some(PlayerKind::Human));
        s.pause(1);
        let report = s.tick();
        assert_eq!(report.tick, 1);
        assert!(s.state(0).unwrap().y() > 0.0);
        assert_eq!(s.state(1).unwrap().y(), 0.0);
    }

    #[test]
    fn ambient_pauses_only_when_every_board_stops() {
        let mut s = session(PlayerKind::Human, Some(PlayerKind::Ai));
        assert!(s.ambient_active());
        assert_eq!(s.pause(0), None);
        assert_eq!(s.end(1), Some(AmbientCue::Pause));
        assert!(!s.ambient_active());
        assert_eq!(s.resume(0), Some(AmbientCue::Play));
        assert_eq!(s.resume(1), None);
    }

    #[test]
    fn single_board_pause_cues() {
        let mut s = session(PlayerKind::Human, None);
        let report = s.apply_action(0, GameAction::Pause);
        assert_eq!(report, ActionReport { applied: true, cue: Some(AmbientCue::Pause) });
        let report = s.apply_action(0, GameAction::Pause);
        assert_eq!(report, ActionReport { applied: true, cue: Some(AmbientCue::Play) });
    }

    #[test]
    fn steered_boards_ignore_moves() {
        let mut s = session(PlayerKind::Ai, None);
        assert!(!s.apply_action(0, GameAction::MoveLeft).applied);
        assert!(s.apply_action(0, GameAction::Pause).applied);
    }

    #[test]
    fn ai_board_gets_a_target_on_spawn() {
        let mut s = session(PlayerKind::Ai, None);
        assert!(s.target(0).is_some());

        let serial = s.state(0).unwrap().piece_serial();
        while s.state(0).unwrap().piece_serial() == serial {
            s.tick();
        }
        assert!(s.target(0).is_some());
    }

    #[test]
    fn ai_piece_lands_on_its_target() {
        let mut s = session(PlayerKind::Ai, None);
        let target = s.target(0).unwrap();
        let kind = s.state(0).unwrap().active().kind;

        let mut lock = None;
        for _ in 0..2_000 {
            if let Some(l) = s.tick().locks.first().copied() {
                lock = Some(l);
                break;
            }
        }
        assert!(lock.is_some());

        let board = s.state(0).unwrap().board();
        let shape = lockstep_tetris_core::shape_of(kind, target.rotation);
        let bottom = board.height() as i32 - 1;
        for (r, c) in shape.filled_cells() {
            let y = bottom - (shape.rows() as i32 - 1 - r as i32);
            assert!(board.is_occupied(target.column + c as i32, y));
        }
    }

    #[test]
    fn external_without_runtime_disconnects() {
        let s = session(PlayerKind::External, None);
        let state = s.state(0).unwrap();
        assert!(state.disconnected());
        assert_eq!(s.target(0), Some(Target { column: state.x(), rotation: 0 }));
    }

    #[test]
    fn topped_out_board_records_its_score() {
        let mut s = session(PlayerKind::Human, None);
        for _ in 0..50_000 {
            if s.is_over() {
                break;
            }
            s.tick();
        }
        assert!(s.is_over());

        let score = s.state(0).unwrap().score();
        let best = &s.high_scores().top(10)[0];
        assert_eq!(s.high_scores().len(), 1);
        assert_eq!(best.name, "Player1");
        assert_eq!(best.config, "10x20(1) Human Single");
        assert_eq!(best.score, score);

        s.restart();
        for _ in 0..50_000 {
            if s.is_over() {
                break;
            }
            s.tick();
        }
        assert_eq!(names_of(&s), vec!["Player1", "Player11"]);
    }

    #[test]
    fn ended_board_is_not_recorded() {
        let mut s = session(PlayerKind::Human, None);
        s.end(0);
        assert!(s.high_scores().is_empty());
    }

    fn names_of(s: &Session) -> Vec<String> {
        let mut names: Vec<String> = s.high_scores().top(10).iter().map(|e| e.name.clone()).collect();
        names.sort();
        names
    }

    #[test]
    fn restart_moves_past_the_previous_game() {
        let mut s = session(PlayerKind::Ai, Some(PlayerKind::Human));
        for _ in 0..3_000 {
            s.tick();
        }
        let cursor = s.state(0).unwrap().piece_index();
        assert!(cursor > 2);

        s.end(0);
        s.end(1);
        assert_eq!(s.restart(), Some(AmbientCue::Play));
        assert_eq!(s.start_index(), cursor + 1);
        assert_eq!(s.ticks(), 0);
        for seat in 0..2 {
            let state = s.state(seat).unwrap();
            assert_eq!(state.piece_index(), cursor + 2);
            assert_eq!(state.score(), 0);
            assert!(!state.game_over());
        }
    }
}
