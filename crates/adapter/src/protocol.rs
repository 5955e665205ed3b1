//! Protocol module - JSON messages for the external move service
//!
//! One request line, one reply line. Grids are row-major arrays of 0/1 ints.

use derive_more::{Display, Error, From};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use lockstep_tetris_core::{GameState, ShapeMatrix};
use lockstep_tetris_engine::Occupancy;

/// Board view sent to the move service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PureGame {
    pub width: usize,
    pub height: usize,
    /// `height` rows of `width` cells
    pub cells: Vec<Vec<u8>>,
    pub current_shape: Vec<Vec<u8>>,
    pub next_shape: Vec<Vec<u8>>,
}

impl PureGame {
    /// Capture a board and its current and next pieces
    pub fn from_state(state: &GameState) -> Self {
        let board = state.board();
        Self {
            width: board.width(),
            height: board.height(),
            cells: board.occupancy_rows(),
            current_shape: state.active().cells().to_rows(),
            next_shape: lockstep_tetris_core::Piece::new(state.next_piece())
                .cells()
                .to_rows(),
        }
    }

    /// Decode the board grid, checking it against the declared size
    pub fn occupancy(&self) -> Result<Occupancy, ProtocolError> {
        let grid = Occupancy::from_rows(&self.cells).ok_or(ProtocolError::BadGrid {
            width: self.width,
            height: self.height,
        })?;
        if grid.width() != self.width || grid.height() != self.height {
            return Err(ProtocolError::BadGrid {
                width: self.width,
                height: self.height,
            });
        }
        Ok(grid)
    }

    pub fn current(&self) -> Result<ShapeMatrix, ProtocolError> {
        ShapeMatrix::from_rows(&self.current_shape).ok_or(ProtocolError::BadShape)
    }
}

/// Reply from the move service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpMove {
    #[serde(rename = "opX")]
    pub op_x: i32,
    #[serde(rename = "opRotate")]
    pub op_rotate: i32,
}

impl OpMove {
    /// "No move" sentinel
    pub const NONE: OpMove = OpMove {
        op_x: -1,
        op_rotate: -1,
    };

    pub fn new(op_x: i32, op_rotate: i32) -> Self {
        Self { op_x, op_rotate }
    }

    /// Target `(column, rotation)`, or `None` for the sentinel
    ///
    /// Any negative component is treated as "no move"; rotations wrap mod 4.
    pub fn target(&self) -> Option<(i32, u8)> {
        if self.op_x < 0 || self.op_rotate < 0 {
            return None;
        }
        Some((self.op_x, (self.op_rotate % 4) as u8))
    }
}

#[derive(Debug, Display, Error, From)]
pub enum ProtocolError {
    #[display("malformed json: {_0}")]
    #[from]
    Json(serde_json::Error),
    #[display("cells do not form a {width}x{height} grid")]
    BadGrid { width: usize, height: usize },
    #[display("current shape is not a valid piece matrix")]
    BadShape,
}

impl ProtocolError {
    pub fn code(&self) -> &'static str {
        match self {
            ProtocolError::Json(_) => "invalid_json",
            ProtocolError::BadGrid { .. } | ProtocolError::BadShape => "invalid_board",
        }
    }
}

/// Serialize one message as a newline-terminated line
pub fn encode_line<T: Serialize>(msg: &T) -> Result<String, ProtocolError> {
    let mut line = serde_json::to_string(msg)?;
    line.push('\n');
    Ok(line)
}

/// Parse one line, ignoring surrounding whitespace
pub fn decode_line<T: DeserializeOwned>(line: &str) -> Result<T, ProtocolError> {
    Ok(serde_json::from_str(line.trim())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use lockstep_tetris_core::types::{PieceKind, PlayerKind};
    use lockstep_tetris_core::{BoardSettings, PieceSequence};

    #[test]
    fn pure_game_uses_wire_field_names() {
        let game = PureGame {
            width: 2,
            height: 1,
            cells: vec![vec![0, 1]],
            current_shape: vec![vec![1, 1], vec![1, 1]],
            next_shape: vec![vec![1, 1, 1, 1]],
        };
        let v: serde_json::Value = serde_json::from_str(&encode_line(&game).unwrap()).unwrap();
        assert_eq!(v["width"], 2);
        assert_eq!(v["height"], 1);
        assert_eq!(v["cells"], serde_json::json!([[0, 1]]));
        assert_eq!(v["currentShape"], serde_json::json!([[1, 1], [1, 1]]));
        assert_eq!(v["nextShape"], serde_json::json!([[1, 1, 1, 1]]));
    }

    #[test]
    fn encoded_message_is_one_line() {
        let line = encode_line(&OpMove::new(3, 1)).unwrap();
        assert_eq!(line, "{\"opX\":3,\"opRotate\":1}\n");
    }

    #[test]
    fn op_move_targets() {
        let op: OpMove = decode_line(" {\"opX\":1,\"opRotate\":2}\r\n").unwrap();
        assert_eq!(op.target(), Some((1, 2)));
        assert_eq!(OpMove::NONE.target(), None);
        assert_eq!(OpMove::new(4, 6).target(), Some((4, 2)));
    }

    #[test]
    fn garbage_is_a_json_error() {
        let err = decode_line::<OpMove>("not json").unwrap_err();
        assert_eq!(err.code(), "invalid_json");
    }

    #[test]
    fn from_state_captures_board_and_pieces() {
        let sequence = Arc::new(PieceSequence::from_pieces(vec![
            PieceKind::Square,
            PieceKind::Straight,
        ]));
        let mut state = lockstep_tetris_core::GameState::new(
            BoardSettings {
                width: 4,
                height: 3,
                start_level: 1,
            },
            PlayerKind::External,
            sequence,
            0,
        );
        state.board_mut().set(3, 2, Some(PieceKind::Z));

        let game = PureGame::from_state(&state);
        assert_eq!(game.cells, vec![vec![0, 0, 0, 0], vec![0, 0, 0, 0], vec![0, 0, 0, 1]]);
        assert_eq!(game.current_shape, vec![vec![1, 1], vec![1, 1]]);
        assert_eq!(game.next_shape, vec![vec![1, 1, 1, 1]]);
        assert_eq!(game.occupancy().unwrap().height(), 3);
    }

    #[test]
    fn mismatched_grid_is_rejected() {
        let game = PureGame {
            width: 3,
            height: 1,
            cells: vec![vec![0, 1]],
            current_shape: vec![vec![1]],
            next_shape: vec![vec![1]],
        };
        assert_eq!(game.occupancy().unwrap_err().code(), "invalid_board");
    }
}
