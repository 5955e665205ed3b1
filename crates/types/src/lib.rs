//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (board engine, placement search, wire protocol, session).
//!
//! # Board Dimensions
//!
//! Field size is chosen per session. The defaults are:
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 at the top)
//!
//! # Gravity
//!
//! Pieces fall continuously: every tick adds a fractional amount to the
//! piece's row.
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 20 | Shared tick period for both boards |
//! | `BASE_SPEED` | 0.02 | Rows per tick before the level bonus |
//! | `SPEED_PER_LEVEL` | 0.01 | Extra rows per tick for every level |
//! | `AI_ASSIST_SPEED` | 0.2 | Extra rows per tick once a steered piece is on target |
//! | `SOFT_DROP_STEP` | 0.5 | Rows added by one soft-drop intent |
//!
//! # Examples
//!
//! ```
//! use lockstep_tetris_types::{GameAction, PieceKind, PlayerKind};
//!
//! assert_eq!(PieceKind::from_str("square"), Some(PieceKind::Square));
//! assert_eq!(PieceKind::Square.as_str(), "square");
//!
//! assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
//!
//! assert_eq!(PlayerKind::from_value(3), PlayerKind::External);
//! assert_eq!(PlayerKind::from_value(42), PlayerKind::Human);
//! ```

/// Default field width in cells
pub const DEFAULT_FIELD_WIDTH: u8 = 10;

/// Default field height in cells
pub const DEFAULT_FIELD_HEIGHT: u8 = 20;

/// Default starting level
pub const DEFAULT_START_LEVEL: u32 = 1;

/// Highest reachable level
pub const MAX_LEVEL: u32 = 10;

/// Cleared lines needed for one level-up
pub const LINES_PER_LEVEL: u32 = 10;

/// Shared tick period in milliseconds
pub const TICK_MS: u32 = 20;

/// Rows per tick at level 0
pub const BASE_SPEED: f64 = 0.02;

/// Additional rows per tick for each level
pub const SPEED_PER_LEVEL: f64 = 0.01;

/// Extra descent applied once a steered piece reached its target
pub const AI_ASSIST_SPEED: f64 = 0.2;

/// Rows added by a soft-drop intent
pub const SOFT_DROP_STEP: f64 = 0.5;

/// Steered pieces are left alone until they have fallen past this row
pub const STEER_START_ROW: f64 = 2.0;

/// Length of the pre-generated piece sequence shared by both boards
pub const PIECE_SEQUENCE_LEN: usize = 100_000;

/// Default host of the external decision-maker
pub const DEFAULT_EXTERNAL_HOST: &str = "localhost";

/// Default port of the external decision-maker
pub const DEFAULT_EXTERNAL_PORT: u16 = 3000;

/// Line clear scoring table
///
/// Points for clearing N lines in a single lock:
/// - 0 lines: 0 points
/// - 1 line: 100 points
/// - 2 lines: 300 points
/// - 3 lines: 600 points
/// - 4 lines: 1000 points
///
/// There is no level multiplier.
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 600, 1000];

/// The six piece kinds
///
/// Each kind has a fixed color used for its locked cells:
/// - **Straight**: light blue, 1x4 bar
/// - **Square**: yellow, 2x2 block
/// - **Z**: green
/// - **ReverseZ**: red (mirror of Z)
/// - **L**: orange
/// - **ReverseL**: deep blue (mirror of L)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Straight,
    Square,
    Z,
    ReverseZ,
    L,
    ReverseL,
}

impl PieceKind {
    /// All kinds in catalog order
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Straight,
        PieceKind::Square,
        PieceKind::Z,
        PieceKind::ReverseZ,
        PieceKind::L,
        PieceKind::ReverseL,
    ];

    /// Position of this kind in the catalog
    pub fn index(self) -> usize {
        match self {
            PieceKind::Straight => 0,
            PieceKind::Square => 1,
            PieceKind::Z => 2,
            PieceKind::ReverseZ => 3,
            PieceKind::L => 4,
            PieceKind::ReverseL => 5,
        }
    }

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use lockstep_tetris_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("STRAIGHT"), Some(PieceKind::Straight));
    /// assert_eq!(PieceKind::from_str("reverse_l"), Some(PieceKind::ReverseL));
    /// assert_eq!(PieceKind::from_str("t"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "straight" => Some(PieceKind::Straight),
            "square" => Some(PieceKind::Square),
            "z" => Some(PieceKind::Z),
            "reverse_z" => Some(PieceKind::ReverseZ),
            "l" => Some(PieceKind::L),
            "reverse_l" => Some(PieceKind::ReverseL),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::Straight => "straight",
            PieceKind::Square => "square",
            PieceKind::Z => "z",
            PieceKind::ReverseZ => "reverse_z",
            PieceKind::L => "l",
            PieceKind::ReverseL => "reverse_l",
        }
    }

    /// Color of cells locked by this kind
    pub fn color(self) -> Rgb {
        match self {
            PieceKind::Straight => Rgb::new(173, 216, 230),
            PieceKind::Square => Rgb::new(255, 255, 0),
            PieceKind::Z => Rgb::new(0, 255, 0),
            PieceKind::ReverseZ => Rgb::new(255, 0, 0),
            PieceKind::L => Rgb::new(255, 200, 0),
            PieceKind::ReverseL => Rgb::new(0, 0, 139),
        }
    }
}

/// 24-bit color, passed through to renderers untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Who decides where a board's pieces go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlayerKind {
    /// Key-press intents only
    #[default]
    Human,
    /// Built-in heuristic placement search
    Ai,
    /// Remote decision-maker reached over the move protocol
    External,
}

impl PlayerKind {
    /// Map the numeric selector used by configuration front-ends
    ///
    /// `1` = human, `2` = AI, `3` = external. Anything else falls back to human.
    pub fn from_value(value: i64) -> Self {
        match value {
            2 => PlayerKind::Ai,
            3 => PlayerKind::External,
            _ => PlayerKind::Human,
        }
    }

    /// Numeric selector for this kind
    pub fn value(self) -> i64 {
        match self {
            PlayerKind::Human => 1,
            PlayerKind::Ai => 2,
            PlayerKind::External => 3,
        }
    }

    /// Parse from a name or a numeric selector
    ///
    /// ```
    /// use lockstep_tetris_types::PlayerKind;
    ///
    /// assert_eq!(PlayerKind::from_str("AI"), Some(PlayerKind::Ai));
    /// assert_eq!(PlayerKind::from_str("3"), Some(PlayerKind::External));
    /// assert_eq!(PlayerKind::from_str("robot"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(value) = s.parse::<i64>() {
            return Some(Self::from_value(value));
        }
        match s.to_lowercase().as_str() {
            "human" => Some(PlayerKind::Human),
            "ai" => Some(PlayerKind::Ai),
            "external" => Some(PlayerKind::External),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerKind::Human => "human",
            PlayerKind::Ai => "ai",
            PlayerKind::External => "external",
        }
    }

    /// Whether pieces on this board are steered toward a decided target
    pub fn is_steered(self) -> bool {
        !matches!(self, PlayerKind::Human)
    }
}

/// Key-press intents a front-end can feed into a board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move piece one column left
    MoveLeft,
    /// Move piece one column right
    MoveRight,
    /// Push piece half a row down, locking it if that is blocked
    SoftDrop,
    /// Rotate piece to its next orientation
    Rotate,
    /// Toggle pause state
    Pause,
}

impl GameAction {
    /// Parse action from string
    ///
    /// # Examples
    ///
    /// ```
    /// use lockstep_tetris_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("softDrop"), Some(GameAction::SoftDrop));
    /// assert_eq!(GameAction::from_str("rotate"), Some(GameAction::Rotate));
    /// assert_eq!(GameAction::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "softdrop" => Some(GameAction::SoftDrop),
            "rotate" => Some(GameAction::Rotate),
            "pause" => Some(GameAction::Pause),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDrop => "softDrop",
            GameAction::Rotate => "rotate",
            GameAction::Pause => "pause",
        }
    }
}

/// A cell on the board
///
/// - `None`: empty cell
/// - `Some(PieceKind)`: cell locked by a piece of that kind
///
/// Occupancy and color are both derived from this single value.
pub type Cell = Option<PieceKind>;
