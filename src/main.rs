//! Headless session runner (default binary).
//!
//! Builds a session from `TETRIS_*` environment variables and drives it at
//! the configured tick until every board is over or `TETRIS_MAX_TICKS` is hit.
//! Rendering is left to front-ends; this binary logs line clears, the final
//! scores and the high-score table.

use anyhow::{Context, Result};
use tracing::info;

use lockstep_tetris::init_tracing;
use lockstep_tetris::session::{Scheduler, Session, SessionConfig};

fn max_ticks_from_env() -> Result<Option<u64>> {
    match std::env::var("TETRIS_MAX_TICKS") {
        Ok(raw) if !raw.trim().is_empty() => {
            let ticks = raw
                .trim()
                .parse()
                .with_context(|| format!("TETRIS_MAX_TICKS: cannot parse {raw:?}"))?;
            Ok(Some(ticks))
        }
        _ => Ok(None),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = SessionConfig::from_env().context("invalid session configuration")?;
    let max_ticks = max_ticks_from_env()?;
    info!(
        width = config.width,
        height = config.height,
        level = config.start_level,
        player_one = config.player_one.as_str(),
        player_two = config.player_two.as_str(),
        extend_mode = config.extend_mode,
        "starting session"
    );

    let mut session = Session::new(config)?;
    let mut scheduler = Scheduler::for_session(&session);
    if let Some(max) = max_ticks {
        scheduler = scheduler.with_max_ticks(max);
    }

    let summary = scheduler
        .run_with(&mut session, |session, report| {
            for lock in &report.locks {
                if lock.outcome.lines_cleared > 0 {
                    if let Some(state) = session.state(lock.seat) {
                        info!(
                            seat = lock.seat,
                            lines = lock.outcome.lines_cleared,
                            score = state.score(),
                            level = state.level(),
                            "lines cleared"
                        );
                    }
                }
            }
        })
        .await;

    for (seat, snapshot) in session.snapshots().iter().enumerate() {
        info!(
            seat,
            score = snapshot.score,
            lines = snapshot.lines,
            level = snapshot.level,
            game_over = snapshot.game_over,
            "final"
        );
    }
    for (rank, entry) in session.high_scores().top(10).iter().enumerate() {
        info!(
            rank = rank + 1,
            name = %entry.name,
            config = %entry.config,
            score = entry.score,
            "high score"
        );
    }
    info!(ticks = summary.ticks, finished = summary.finished, "session finished");
    Ok(())
}
