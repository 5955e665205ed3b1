//! Reference move service.
//!
//! Answers placement requests with the built-in heuristic search, so external
//! seats have something to talk to.

use anyhow::Result;

use lockstep_tetris::adapter::{heuristic_decider, run_move_server, MoveServerConfig};
use lockstep_tetris::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    run_move_server(MoveServerConfig::from_env(), heuristic_decider(), None).await
}
