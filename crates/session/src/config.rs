//! Session configuration
//!
//! Passed explicitly into [`Session::new`](crate::Session::new); nothing reads
//! global state after start-up.

use std::time::Duration;

use arrayvec::ArrayVec;
use derive_more::{Display, Error};

use lockstep_tetris_adapter::ClientConfig;
use lockstep_tetris_core::BoardSettings;

use crate::types::*;

pub const MIN_FIELD_SIDE: usize = 4;
pub const MAX_FIELD_SIDE: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub width: usize,
    pub height: usize,
    pub start_level: u32,
    pub player_one: PlayerKind,
    pub player_two: PlayerKind,
    /// Two boards instead of one
    pub extend_mode: bool,
    pub seed: u32,
    pub tick: Duration,
    pub external: ClientConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_FIELD_WIDTH as usize,
            height: DEFAULT_FIELD_HEIGHT as usize,
            start_level: DEFAULT_START_LEVEL,
            player_one: PlayerKind::Human,
            player_two: PlayerKind::Human,
            extend_mode: false,
            seed: 12345,
            tick: Duration::from_millis(TICK_MS as u64),
            external: ClientConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ConfigError {
    #[display("{var}: cannot parse {value:?}")]
    InvalidValue { var: &'static str, value: String },
    #[display("field width {width} outside 4..=64")]
    Width { width: usize },
    #[display("field height {height} outside 4..=64")]
    Height { height: usize },
    #[display("start level {level} outside 1..=10")]
    Level { level: u32 },
    #[display("tick period must be positive")]
    ZeroTick,
}

fn env_value<T>(var: &'static str, parse: impl Fn(&str) -> Option<T>) -> Result<Option<T>, ConfigError> {
    match std::env::var(var) {
        Ok(raw) if !raw.trim().is_empty() => parse(raw.trim())
            .map(Some)
            .ok_or(ConfigError::InvalidValue { var, value: raw }),
        _ => Ok(None),
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl SessionConfig {
    /// Defaults overridden by `TETRIS_*` environment variables, then validated
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(v) = env_value("TETRIS_FIELD_WIDTH", |s| s.parse().ok())? {
            config.width = v;
        }
        if let Some(v) = env_value("TETRIS_FIELD_HEIGHT", |s| s.parse().ok())? {
            config.height = v;
        }
        if let Some(v) = env_value("TETRIS_START_LEVEL", |s| s.parse().ok())? {
            config.start_level = v;
        }
        if let Some(v) = env_value("TETRIS_PLAYER_ONE", PlayerKind::from_str)? {
            config.player_one = v;
        }
        if let Some(v) = env_value("TETRIS_PLAYER_TWO", PlayerKind::from_str)? {
            config.player_two = v;
        }
        if let Some(v) = env_value("TETRIS_EXTEND_MODE", parse_flag)? {
            config.extend_mode = v;
        }
        if let Some(v) = env_value("TETRIS_SEED", |s| s.parse().ok())? {
            config.seed = v;
        }
        if let Some(v) = env_value("TETRIS_TICK_MS", |s| s.parse().ok())? {
            config.tick = Duration::from_millis(v);
        }
        config.external = ClientConfig::from_env();

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let side = MIN_FIELD_SIDE..=MAX_FIELD_SIDE;
        if !side.contains(&self.width) {
            return Err(ConfigError::Width { width: self.width });
        }
        if !side.contains(&self.height) {
            return Err(ConfigError::Height {
                height: self.height,
            });
        }
        if !(1..=MAX_LEVEL).contains(&self.start_level) {
            return Err(ConfigError::Level {
                level: self.start_level,
            });
        }
        if self.tick.is_zero() {
            return Err(ConfigError::ZeroTick);
        }
        Ok(())
    }

    pub fn board_settings(&self) -> BoardSettings {
        BoardSettings {
            width: self.width,
            height: self.height,
            start_level: self.start_level,
        }
    }

    /// Player kind for each board, in seat order
    pub fn seats(&self) -> ArrayVec<PlayerKind, 2> {
        let mut seats = ArrayVec::new();
        seats.push(self.player_one);
        if self.extend_mode {
            seats.push(self.player_two);
        }
        seats
    }

    pub fn uses_external(&self) -> bool {
        self.seats().contains(&PlayerKind::External)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SessionConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.tick, Duration::from_millis(20));
        assert_eq!(config.seats().as_slice(), &[PlayerKind::Human]);
    }

    #[test]
    fn extend_mode_adds_second_seat() {
        let config = SessionConfig {
            extend_mode: true,
            player_two: PlayerKind::External,
            ..SessionConfig::default()
        };
        assert_eq!(
            config.seats().as_slice(),
            &[PlayerKind::Human, PlayerKind::External]
        );
        assert!(config.uses_external());
    }

    #[test]
    fn validate_rejects_out_of_range() {
        let bad = [
            SessionConfig {
                width: 3,
                ..SessionConfig::default()
            },
            SessionConfig {
                height: 65,
                ..SessionConfig::default()
            },
            SessionConfig {
                start_level: 0,
                ..SessionConfig::default()
            },
            SessionConfig {
                tick: Duration::ZERO,
                ..SessionConfig::default()
            },
        ];
        for config in bad {
            assert!(config.validate().is_err(), "{config:?}");
        }
        assert_eq!(
            SessionConfig {
                start_level: 11,
                ..SessionConfig::default()
            }
            .validate(),
            Err(ConfigError::Level { level: 11 })
        );
    }

    #[test]
    fn flags_parse() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
