//! Hand-off file ingestion.
//!
//! A finished game process may leave `<id>_last_score.txt` in the data
//! directory, containing two whitespace-separated integers: the final score
//! and the game's own idea of the high score. Consuming the file is
//! destructive (delete-after-read makes ingestion at-most-once) and a
//! missing file is a no-op, so repeated checks are safe.

use fs_err as fs;
use tracing::{info, warn};

use crate::error::{LauncherError, Result};
use crate::scores::ScoreStore;
use crate::storage::StorageConfig;
use crate::types::{GameId, ScoreEntry};

/// Name credited when a score arrives via hand-off rather than an explicit
/// submission.
pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// Checks for a game's hand-off file and folds its score into the table.
///
/// Returns `Ok(None)` when no file exists. A file that exists but does not
/// parse as two integers is deleted anyway, since a stale corrupt file
/// must not wedge every later check, and `HandoffParseFailed` is returned.
pub fn check_and_ingest(
    config: &StorageConfig,
    scores: &mut ScoreStore,
    game: GameId,
) -> Result<Option<ScoreEntry>> {
    let path = config.handoff_file(game);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(LauncherError::Io {
                context: format!("reading hand-off file {}", path.display()),
                source,
            });
        }
    };

    let parsed = parse_handoff(&content);
    if let Err(err) = fs::remove_file(&path) {
        warn!(path = %path.display(), error = %err, "Failed to remove hand-off file");
    }

    let Some((score, _high_score)) = parsed else {
        return Err(LauncherError::HandoffParseFailed {
            path,
            details: format!("expected two integers, got {:?}", content.trim()),
        });
    };

    let entry = scores.add(game, DEFAULT_PLAYER_NAME, score)?;
    info!(game = %game, score, "Ingested hand-off score");
    Ok(Some(entry))
}

/// Exactly two integers, `score` then `high_score`.
fn parse_handoff(content: &str) -> Option<(i64, i64)> {
    let mut parts = content.split_whitespace();
    let score = parts.next()?.parse().ok()?;
    let high_score = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((score, high_score))
}
