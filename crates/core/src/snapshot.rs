use crate::pieces::ShapeMatrix;
use crate::types::{PieceKind, PlayerKind, Rgb};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: u8,
    pub x: i32,
    pub y: f64,
    pub cells: ShapeMatrix,
}

/// Read-only view of one board for rendering and observers
#[derive(Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    pub width: usize,
    pub height: usize,
    pub occupancy: Vec<Vec<bool>>,
    pub colors: Vec<Vec<Option<Rgb>>>,
    pub active: ActiveSnapshot,
    pub next: PieceKind,
    pub next_cells: ShapeMatrix,
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    pub paused: bool,
    pub game_over: bool,
    pub disconnected: bool,
    pub player_kind: PlayerKind,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        !self.game_over && !self.paused
    }

    pub fn filled_count(&self) -> usize {
        self.occupancy.iter().flatten().filter(|&&c| c).count()
    }
}
