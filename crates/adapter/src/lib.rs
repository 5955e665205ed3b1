//! Adapter - external move service over TCP with a line-JSON protocol
//!
//! A board driven by an external player does not decide its own placements.
//! Whenever a new piece spawns, the session sends the board to a move service
//! and steers the piece toward whatever `(column, rotation)` comes back.
//!
//! # Protocol Overview
//!
//! 1. **Connection**: client connects to the service (default: localhost:3000)
//! 2. **Request**: client writes one [`PureGame`] line
//! 3. **Reply**: service writes one [`OpMove`] line
//! 4. **Close**: client drops the connection
//!
//! `{"opX":-1,"opRotate":-1}` means the service has no move.
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Service: {"width":4,"height":2,"cells":[[0,0,0,0],[1,1,1,0]],"currentShape":[[1,1,1,1]],"nextShape":[[1,1],[1,1]]}
//! Service -> Client: {"opX":3,"opRotate":1}
//! ```
//!
//! # Environment Variables
//!
//! - `TETRIS_EXTERNAL_HOST` / `TETRIS_EXTERNAL_PORT`: where clients connect
//! - `TETRIS_MOVE_SERVER_HOST` / `TETRIS_MOVE_SERVER_PORT`: where [`server`] binds
//!
//! # Implementation
//!
//! - Uses **tokio** for async networking
//! - See [`protocol`] for message structure definitions
//! - See [`client`] for the per-request client
//! - See [`server`] for a reference service backed by the heuristic search

pub mod client;
pub mod protocol;
pub mod server;

pub use lockstep_tetris_core as core;
pub use lockstep_tetris_types as types;

pub use client::{exchange, ClientConfig, ClientError, MoveClient};
pub use protocol::{decode_line, encode_line, OpMove, ProtocolError, PureGame};
pub use server::{heuristic_decider, heuristic_move, run_move_server, Decider, MoveServerConfig};
