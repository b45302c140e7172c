//! Per-grid result records.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::GridConfig;
use crate::error::StoreError;

/// Record key for one board size, written `"{rows}x{columns}"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridKey {
    pub rows: u32,
    pub columns: u32,
}

impl GridKey {
    /// Create a key.
    #[must_use]
    pub const fn new(rows: u32, columns: u32) -> Self {
        Self { rows, columns }
    }
}

impl From<GridConfig> for GridKey {
    fn from(grid: GridConfig) -> Self {
        Self::new(grid.rows, grid.columns)
    }
}

impl fmt::Display for GridKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.columns)
    }
}

impl FromStr for GridKey {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || StoreError::InvalidKey(s.to_string());
        let (rows, columns) = s.split_once('x').ok_or_else(invalid)?;
        let rows = rows.trim().parse().map_err(|_| invalid())?;
        let columns = columns.trim().parse().map_err(|_| invalid())?;
        Ok(Self::new(rows, columns))
    }
}

// Keys travel as strings so they can be JSON object keys.
impl Serialize for GridKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GridKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Outcome of one finished game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub score: u64,
    /// Longest streak reached.
    pub combo: u32,
    pub efficiency: f64,
    pub turns: u32,
    pub matches: u32,
    /// Time spent playing, pauses excluded.
    pub time: Duration,
    pub played_at: DateTime<Utc>,
}

/// Best and most recent results for one board size.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BestRecord {
    // Bests
    pub high_score: u64,
    pub best_combo: u32,
    pub highest_efficiency: f64,

    // Most recent game
    pub last_score: u64,
    pub last_turns: u32,
    pub last_matches: u32,
    pub last_efficiency: f64,
    pub last_time_secs: f64,

    pub games_played: u32,
    /// RFC 3339 timestamp of the most recent game, empty if none.
    pub last_played: String,
}

impl BestRecord {
    /// Fold a finished game into the record.
    ///
    /// Bests only move when strictly beaten; last-game fields always take
    /// the new values.
    pub fn apply(&mut self, summary: &GameSummary) {
        if summary.score > self.high_score {
            self.high_score = summary.score;
        }
        if summary.combo > self.best_combo {
            self.best_combo = summary.combo;
        }
        if summary.efficiency > self.highest_efficiency {
            self.highest_efficiency = summary.efficiency;
        }

        self.last_score = summary.score;
        self.last_turns = summary.turns;
        self.last_matches = summary.matches;
        self.last_efficiency = summary.efficiency;
        self.last_time_secs = summary.time.as_secs_f64();

        self.games_played += 1;
        self.last_played = summary.played_at.to_rfc3339();
    }

    /// When the most recent game was played, if recorded.
    #[must_use]
    pub fn last_played_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.last_played)
            .ok()
            .map(|at| at.with_timezone(&Utc))
    }
}
