//! High scores - in-memory table of finished games
//!
//! Entries stay sorted by score, highest first. Equal scores keep the order
//! they were recorded in. Names are unique: a repeated name gets the lowest
//! numeric suffix that is still free (`Player1`, `Player11`, `Player12`, ...).

use crate::types::PlayerKind;

/// One finished game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    pub name: String,
    /// Settings the game was played with, see [`config_label`]
    pub config: String,
    pub score: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighScores {
    entries: Vec<ScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// `name` itself if it is free, else `name` plus the first free number
    pub fn unique_name(&self, name: &str) -> String {
        if !self.contains(name) {
            return name.to_string();
        }
        let mut n = 1u32;
        loop {
            let candidate = format!("{name}{n}");
            if !self.contains(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Record a score under a unique version of `name`; returns the name used
    pub fn record(&mut self, name: &str, config: &str, score: u32) -> String {
        let name = self.unique_name(name);
        let at = self.entries.partition_point(|e| e.score >= score);
        self.entries.insert(
            at,
            ScoreEntry {
                name: name.clone(),
                config: config.to_string(),
                score,
            },
        );
        name
    }

    /// The best `limit` entries, highest first
    pub fn top(&self, limit: usize) -> &[ScoreEntry] {
        &self.entries[..limit.min(self.entries.len())]
    }

    pub fn config_of(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.config.as_str())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Settings label stored next to a score, e.g. `10x20(5) Human Double`
pub fn config_label(
    width: usize,
    height: usize,
    level: u32,
    player: PlayerKind,
    extended: bool,
) -> String {
    let player = match player {
        PlayerKind::Human => "Human",
        PlayerKind::Ai => "AI",
        PlayerKind::External => "External",
    };
    let mode = if extended { "Double" } else { "Single" };
    format!("{width}x{height}({level}) {player} {mode}")
}
