//! Lockstep Tetris (workspace facade crate).
//!
//! Re-exports the member crates under one roof so binaries, integration
//! tests, and benches can write `lockstep_tetris::{core, engine, ...}`.

pub use lockstep_tetris_adapter as adapter;
pub use lockstep_tetris_core as core;
pub use lockstep_tetris_engine as engine;
pub use lockstep_tetris_session as session;
pub use lockstep_tetris_types as types;

/// Install the `tracing` subscriber used by the binaries
///
/// Honours `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
