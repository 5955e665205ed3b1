//! Decision slots - where steered boards get their targets
//!
//! Every spawn on an AI or external board needs exactly one decision. The AI
//! decides on the spot; an external decision runs as a tokio task and hands
//! its result back through a oneshot channel that the tick path polls without
//! blocking. Each request remembers the piece serial it was made for, so a
//! reply that arrives after the piece has locked is thrown away.

use tokio::runtime::Handle;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, warn};

use lockstep_tetris_adapter::{MoveClient, PureGame};
use lockstep_tetris_core::GameState;
use lockstep_tetris_engine::best_placement_for;

use crate::types::{AI_ASSIST_SPEED, STEER_START_ROW};

/// Column and rotation a steered piece heads for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub column: i32,
    pub rotation: u8,
}

impl Target {
    /// Target the search falls back to when nothing fits
    pub const ORIGIN: Self = Self {
        column: 0,
        rotation: 0,
    };

    /// "Stay put" target used when no decision could be made
    pub fn fallback(state: &GameState) -> Self {
        Self {
            column: state.x(),
            rotation: 0,
        }
    }
}

#[derive(Debug)]
struct Pending {
    serial: u64,
    base_rotation: u8,
    rx: oneshot::Receiver<Option<(i32, u8)>>,
}

/// Decision state for one board
#[derive(Debug, Default)]
pub struct DecisionSlot {
    /// Target and the piece serial it belongs to
    target: Option<(u64, Target)>,
    pending: Option<Pending>,
}

impl DecisionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Target for the piece with `serial`, if one has been decided
    pub fn target_for(&self, serial: u64) -> Option<Target> {
        self.target
            .filter(|(s, _)| *s == serial)
            .map(|(_, target)| target)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop any outstanding request; its reply will be ignored
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            debug!("outstanding decision dropped");
        }
    }

    pub fn clear(&mut self) {
        self.cancel();
        self.target = None;
    }

    fn needs_request(&self, serial: u64) -> bool {
        self.pending.is_none() && self.target_for(serial).is_none()
    }

    /// Decide with the built-in search
    pub fn decide_ai(&mut self, state: &GameState) {
        let serial = state.piece_serial();
        if !self.needs_request(serial) {
            return;
        }

        let target = match best_placement_for(state.board(), state.active()) {
            Some(p) => Target {
                column: p.column,
                rotation: p.rotation,
            },
            None => Target::ORIGIN,
        };
        debug!(serial, column = target.column, rotation = target.rotation, "ai decided");
        self.target = Some((serial, target));
    }

    /// Ask the move service, unless a request is already out
    ///
    /// Without a runtime the board is marked disconnected and gets the
    /// fallback target straight away.
    pub fn request_external(
        &mut self,
        state: &mut GameState,
        client: &MoveClient,
        runtime: Option<&Handle>,
    ) {
        let serial = state.piece_serial();
        if !self.needs_request(serial) {
            return;
        }

        let Some(handle) = runtime else {
            warn!(serial, "no async runtime for external decisions");
            state.set_disconnected(true);
            self.target = Some((serial, Target::fallback(state)));
            return;
        };

        let (tx, rx) = oneshot::channel();
        let game = PureGame::from_state(state);
        let client = client.clone();
        handle.spawn(async move {
            let reply = client.request_move(&game).await;
            let _ = tx.send(reply);
        });

        debug!(serial, "external decision requested");
        self.pending = Some(Pending {
            serial,
            base_rotation: state.active().rotation,
            rx,
        });
    }

    /// Collect a finished external decision, if any
    ///
    /// Returns true when a reply was consumed (applied or discarded).
    pub fn poll(&mut self, state: &mut GameState) -> bool {
        let Some(pending) = self.pending.as_mut() else {
            return false;
        };

        let reply = match pending.rx.try_recv() {
            Ok(reply) => reply,
            Err(TryRecvError::Empty) => return false,
            // The task went away without answering.
            Err(TryRecvError::Closed) => None,
        };
        let (serial, base_rotation) = (pending.serial, pending.base_rotation);
        self.pending = None;

        if serial != state.piece_serial() {
            debug!(serial, current = state.piece_serial(), "stale decision discarded");
            return true;
        }

        let target = match reply {
            Some((column, rotation)) => {
                state.set_disconnected(false);
                Target {
                    column,
                    rotation: (base_rotation + rotation) % 4,
                }
            }
            None => {
                state.set_disconnected(true);
                Target::fallback(state)
            }
        };
        debug!(serial, column = target.column, rotation = target.rotation, "external decided");
        self.target = Some((serial, target));
        true
    }
}

/// Take one steering step toward `target` and return the extra gravity
///
/// Nothing happens until the piece has fallen past the steering row. Then the
/// rotation is matched first, then the column one step at a time; once both
/// match the piece gets the assist speed.
pub fn steer(state: &mut GameState, target: Target) -> f64 {
    if state.y() <= STEER_START_ROW {
        return 0.0;
    }

    if state.active().rotation != target.rotation {
        state.rotate();
        0.0
    } else if state.x() != target.column {
        state.shift((target.column - state.x()).signum());
        0.0
    } else {
        AI_ASSIST_SPEED
    }
}
