//! Ranked high-score persistence.
//!
//! # File Format
//!
//! One entry per line, whitespace-separated:
//!
//! ```text
//! "name" value "date"
//! ```
//!
//! Name and date are quoted (with `\"` and `\\` escapes) so embedded spaces
//! round-trip; value is a bare decimal integer. On-disk order is not
//! trusted: the loader re-sorts descending by value. Malformed lines are
//! skipped, not fatal.

use std::path::Path;

use chrono::Local;
use fs_err as fs;
use tracing::warn;

use crate::error::Result;
use crate::storage::{write_atomic, StorageConfig};
use crate::types::{GameId, ScoreEntry};

/// Maximum number of ranked entries retained per game. Insertion beyond
/// this silently discards the lowest-ranked tail.
pub const SCORE_TABLE_CAPACITY: usize = 10;

/// In-memory high-score tables for both games, one backing file per game.
///
/// Loaded once at launcher startup and mutated in place; every mutation is
/// flushed to disk immediately. On a write failure the in-memory table
/// remains the source of truth and the error is reported to the caller.
pub struct ScoreStore {
    config: StorageConfig,
    tables: [Vec<ScoreEntry>; 2],
}

impl ScoreStore {
    /// Loads both games' score files. A missing file is an empty table.
    pub fn load(config: StorageConfig) -> Self {
        let tables = GameId::ALL.map(|game| load_table(&config.scores_file(game)));
        Self { config, tables }
    }

    /// The full ranked table, best first.
    pub fn entries(&self, game: GameId) -> &[ScoreEntry] {
        &self.tables[game.index()]
    }

    /// Top `n` entries, as the score displays show them.
    pub fn top(&self, game: GameId, n: usize) -> &[ScoreEntry] {
        let table = self.entries(game);
        &table[..table.len().min(n)]
    }

    /// Adds an entry stamped with today's date, keeps the table sorted
    /// descending and capped at [`SCORE_TABLE_CAPACITY`], and rewrites the
    /// game's file. Returns the stamped entry.
    pub fn add(&mut self, game: GameId, name: &str, value: i64) -> Result<ScoreEntry> {
        let entry = ScoreEntry {
            name: name.to_string(),
            value,
            date: Local::now().format("%Y-%m-%d").to_string(),
        };
        let table = &mut self.tables[game.index()];
        table.push(entry.clone());
        // Stable sort: equal values keep insertion order.
        table.sort_by(|a, b| b.value.cmp(&a.value));
        table.truncate(SCORE_TABLE_CAPACITY);
        self.save(game)?;
        Ok(entry)
    }

    fn save(&self, game: GameId) -> Result<()> {
        let mut out = String::new();
        for entry in self.entries(game) {
            out.push_str(&quote(&entry.name));
            out.push(' ');
            out.push_str(&entry.value.to_string());
            out.push(' ');
            out.push_str(&quote(&entry.date));
            out.push('\n');
        }
        write_atomic(&self.config.scores_file(game), &out)
    }
}

fn load_table(path: &Path) -> Vec<ScoreEntry> {
    let Ok(content) = fs::read_to_string(path) else {
        return Vec::new();
    };

    let mut table = Vec::new();
    let mut skipped = 0usize;
    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line) {
            Some(entry) => table.push(entry),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        warn!(path = %path.display(), skipped, "Skipped malformed score lines");
    }

    table.sort_by(|a, b| b.value.cmp(&a.value));
    table
}

fn parse_line(line: &str) -> Option<ScoreEntry> {
    let fields = split_fields(line)?;
    let [name, value, date] = <[String; 3]>::try_from(fields).ok()?;
    let value = value.parse().ok()?;
    Some(ScoreEntry { name, value, date })
}

/// Wraps a field in double quotes, backslash-escaping `"` and `\`.
fn quote(field: &str) -> String {
    let mut out = String::with_capacity(field.len() + 2);
    out.push('"');
    for ch in field.chars() {
        if ch == '"' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

/// Splits a line into fields, honoring quoted tokens with escapes.
/// Returns `None` on unterminated quoting.
fn split_fields(line: &str) -> Option<Vec<String>> {
    let mut fields = Vec::new();
    let mut chars = line.chars().peekable();
    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        let Some(&first) = chars.peek() else {
            break;
        };
        let mut field = String::new();
        if first == '"' {
            chars.next();
            let mut closed = false;
            while let Some(ch) = chars.next() {
                match ch {
                    '\\' => field.push(chars.next()?),
                    '"' => {
                        closed = true;
                        break;
                    }
                    other => field.push(other),
                }
            }
            if !closed {
                return None;
            }
        } else {
            while let Some(ch) = chars.next_if(|c| !c.is_whitespace()) {
                field.push(ch);
            }
        }
        fields.push(field);
    }
    Some(fields)
}
