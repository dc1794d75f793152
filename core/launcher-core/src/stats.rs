//! Aggregate play-statistics persistence.
//!
//! # File Format
//!
//! One line per game:
//!
//! ```text
//! <id> <play_count> <total_seconds> <last_played_epoch>
//! ```
//!
//! Ids are the space-free short ids, so plain whitespace splitting is
//! unambiguous. Epoch `0` encodes never-played. Every mutation rewrites the
//! whole file, so it is always fully consistent; there are no appends to
//! corrupt.

use std::time::Duration;

use chrono::{DateTime, Utc};
use fs_err as fs;

use crate::error::Result;
use crate::storage::{write_atomic, StorageConfig};
use crate::types::{GameId, GameStats};

/// Play statistics for both games, backed by a single file.
///
/// Games missing from the file (or the file itself being absent) default to
/// zero counts and never-played. Unknown ids in the file are ignored.
pub struct StatsStore {
    config: StorageConfig,
    stats: [GameStats; 2],
}

impl StatsStore {
    pub fn load(config: StorageConfig) -> Self {
        let mut stats = GameId::ALL.map(GameStats::empty);
        if let Ok(content) = fs::read_to_string(config.stats_file()) {
            for line in content.lines() {
                let Some(parsed) = parse_line(line) else {
                    continue;
                };
                let index = parsed.game.index();
                stats[index] = parsed;
            }
        }
        Self { config, stats }
    }

    pub fn get(&self, game: GameId) -> &GameStats {
        &self.stats[game.index()]
    }

    pub fn all(&self) -> &[GameStats] {
        &self.stats
    }

    /// Folds one completed session into the game's record and rewrites the
    /// file. On a write failure the in-memory record keeps the new values
    /// and the error is returned.
    pub fn record_session(
        &mut self,
        game: GameId,
        duration: Duration,
        ended_at: DateTime<Utc>,
    ) -> Result<()> {
        let entry = &mut self.stats[game.index()];
        entry.play_count += 1;
        entry.total_play_time += duration;
        entry.last_played = Some(ended_at);
        self.save()
    }

    fn save(&self) -> Result<()> {
        let mut out = String::new();
        for entry in &self.stats {
            let epoch = entry.last_played.map_or(0, |t| t.timestamp());
            out.push_str(&format!(
                "{} {} {} {}\n",
                entry.game.as_str(),
                entry.play_count,
                entry.total_play_time.as_secs(),
                epoch
            ));
        }
        write_atomic(&self.config.stats_file(), &out)
    }
}

fn parse_line(line: &str) -> Option<GameStats> {
    let mut parts = line.split_whitespace();
    let game: GameId = parts.next()?.parse().ok()?;
    let play_count = parts.next()?.parse().ok()?;
    let seconds: u64 = parts.next()?.parse().ok()?;
    let epoch: i64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    let last_played = if epoch == 0 {
        None
    } else {
        DateTime::from_timestamp(epoch, 0)
    };
    Some(GameStats {
        game,
        play_count,
        total_play_time: Duration::from_secs(seconds),
        last_played,
    })
}
