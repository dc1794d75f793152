//! Core types shared by every launcher front-end.
//!
//! The terminal menu and the GTK variants all consume these exact types, so
//! score tables and play statistics render identically everywhere.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::LauncherError;

// ═══════════════════════════════════════════════════════════════════════════════
// Game Identity
// ═══════════════════════════════════════════════════════════════════════════════

/// Identifier for one of the two supported games.
///
/// A closed enum rather than an open string: the rest of the crate is total
/// over it, so an unknown id can only arise while parsing front-end input
/// (see the [`FromStr`] impl).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameId {
    Manic,
    JetSet,
}

impl GameId {
    pub const ALL: [GameId; 2] = [GameId::Manic, GameId::JetSet];

    /// Stable short id used in file names and the stats file. Never
    /// contains whitespace; the persisted formats rely on that.
    pub fn as_str(&self) -> &'static str {
        match self {
            GameId::Manic => "manic",
            GameId::JetSet => "jetset",
        }
    }

    /// Human-readable title for cards, menus and dialogs.
    pub fn display_name(&self) -> &'static str {
        match self {
            GameId::Manic => "Manic Miner",
            GameId::JetSet => "Jet Set Willy",
        }
    }

    /// Original release year.
    pub fn year(&self) -> u16 {
        match self {
            GameId::Manic => 1983,
            GameId::JetSet => 1984,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            GameId::Manic => 0,
            GameId::JetSet => 1,
        }
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameId {
    type Err = LauncherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manic" => Ok(GameId::Manic),
            "jetset" => Ok(GameId::JetSet),
            other => Err(LauncherError::InvalidGameId(other.to_string())),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Scores and Statistics
// ═══════════════════════════════════════════════════════════════════════════════

/// One ranked high-score table entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub value: i64,
    /// Local date the score was recorded, `YYYY-MM-DD`.
    pub date: String,
}

/// Aggregate play statistics for a single game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    pub game: GameId,
    pub play_count: u32,
    pub total_play_time: Duration,
    /// `None` until the first completed session.
    pub last_played: Option<DateTime<Utc>>,
}

impl GameStats {
    pub(crate) fn empty(game: GameId) -> Self {
        Self {
            game,
            play_count: 0,
            total_play_time: Duration::ZERO,
            last_played: None,
        }
    }

    /// Formats the cumulative play time the way the game cards show it,
    /// e.g. `"3h 21m"` or `"5m"`.
    pub fn format_play_time(&self) -> String {
        let mins = self.total_play_time.as_secs() / 60;
        let hours = mins / 60;
        if hours > 0 {
            format!("{}h {}m", hours, mins % 60)
        } else {
            format!("{}m", mins)
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Session Messages
// ═══════════════════════════════════════════════════════════════════════════════

/// Completion message produced when a game process exits.
///
/// In the non-blocking launch model the background wait thread sends exactly
/// one of these over the caller's channel; the caller hands it back to
/// `SessionLauncher::complete` on its control thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionFinished {
    pub game: GameId,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

/// Outcome of one completed play session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub game: GameId,
    pub exit_code: Option<i32>,
    pub duration: Duration,
    pub ended_at: DateTime<Utc>,
    /// Score ingested from the game's hand-off file, if it wrote one.
    pub ingested_score: Option<ScoreEntry>,
}
