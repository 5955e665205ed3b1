//! Scheduler - drives a session from a periodic timer

use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::session::{Session, TickReport};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub locks: u64,
    /// Every board reached game over
    pub finished: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduler {
    period: Duration,
    max_ticks: Option<u64>,
}

impl Scheduler {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            max_ticks: None,
        }
    }

    /// Tick at the session's configured period
    pub fn for_session(session: &Session) -> Self {
        Self::new(session.config().tick)
    }

    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = Some(max_ticks);
        self
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub async fn run(&self, session: &mut Session) -> RunSummary {
        self.run_with(session, |_, _| {}).await
    }

    /// Tick until every board is over or the tick limit is hit
    ///
    /// `on_tick` sees the session right after each step.
    pub async fn run_with<F>(&self, session: &mut Session, mut on_tick: F) -> RunSummary
    where
        F: FnMut(&Session, &TickReport),
    {
        let mut timer = interval(self.period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut summary = RunSummary::default();

        loop {
            if session.is_over() {
                summary.finished = true;
                break;
            }
            if self.max_ticks.is_some_and(|max| summary.ticks >= max) {
                break;
            }

            timer.tick().await;
            let report = session.tick();
            summary.ticks += 1;
            summary.locks += report.locks.len() as u64;
            if let Some(cue) = report.cue {
                debug!(?cue, tick = report.tick, "ambient cue");
            }
            on_tick(session, &report);
        }

        info!(
            ticks = summary.ticks,
            locks = summary.locks,
            finished = summary.finished,
            "scheduler stopped"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::types::PlayerKind;

    fn ai_session() -> Session {
        Session::with_handle(
            SessionConfig {
                player_one: PlayerKind::Ai,
                ..SessionConfig::default()
            },
            None,
        )
        .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn stops_at_tick_limit() {
        let mut session = ai_session();
        let scheduler = Scheduler::for_session(&session).with_max_ticks(100);
        assert_eq!(scheduler.period(), Duration::from_millis(20));

        let mut seen = 0;
        let summary = scheduler.run_with(&mut session, |_, _| seen += 1).await;
        assert_eq!(summary.ticks, 100);
        assert!(!summary.finished);
        assert_eq!(seen, 100);
        assert_eq!(session.ticks(), 100);
    }

    #[tokio::test(start_paused = true)]
    async fn finished_session_does_not_tick() {
        let mut session = ai_session();
        session.end(0);
        let summary = Scheduler::new(Duration::from_millis(5)).run(&mut session).await;
        assert_eq!(summary, RunSummary { ticks: 0, locks: 0, finished: true });
    }

    #[tokio::test(start_paused = true)]
    async fn ai_game_keeps_locking() {
        let mut session = ai_session();
        let summary = Scheduler::for_session(&session)
            .with_max_ticks(20_000)
            .run(&mut session)
            .await;
        assert!(summary.locks > 10);
        assert_eq!(summary.finished, session.is_over());
    }
}
