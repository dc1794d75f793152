//! Storage configuration and path resolution for the launcher.
//!
//! A single `StorageConfig` owns both base directories: where the game
//! builds are installed and where persisted launcher state (score tables,
//! play statistics, hand-off files) lives. Centralizing the path decisions
//! keeps every store testable via injection of temp roots.

use std::io::Write;
use std::path::{Path, PathBuf};

use fs_err as fs;
use tempfile::NamedTempFile;

use crate::error::{LauncherError, Result};
use crate::types::GameId;

/// Per-game executable location relative to the games root.
fn executable_suffix(game: GameId) -> &'static str {
    match game {
        GameId::Manic => "ManicMiner/manicminer",
        GameId::JetSet => "JetSetWilly/jetsetwilly",
    }
}

/// Central configuration for all launcher paths.
///
/// Production code uses `StorageConfig::default()`, which points at the
/// conventional per-user locations. Tests inject temp directories with
/// [`StorageConfig::with_roots`].
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory the game builds are installed under
    /// (default: ~/matthew-smith-games-enhanced).
    games_root: PathBuf,
    /// Directory for persisted launcher state
    /// (default: ~/.config/matthew-smith-games).
    data_root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let home = dirs::home_dir().expect("Could not find home directory");
        Self {
            games_root: home.join("matthew-smith-games-enhanced"),
            data_root: home.join(".config").join("matthew-smith-games"),
        }
    }
}

impl StorageConfig {
    /// Creates a StorageConfig with custom base directories.
    pub fn with_roots(games_root: PathBuf, data_root: PathBuf) -> Self {
        Self {
            games_root,
            data_root,
        }
    }

    pub fn games_root(&self) -> &Path {
        &self.games_root
    }

    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    /// Path to a game's executable. Pure string construction, no I/O.
    pub fn game_executable(&self, game: GameId) -> PathBuf {
        self.games_root.join(executable_suffix(game))
    }

    /// Path to a game's persisted high-score table.
    pub fn scores_file(&self, game: GameId) -> PathBuf {
        self.data_root.join(format!("{}_scores.txt", game.as_str()))
    }

    /// Path to the transient hand-off file a finished game process may
    /// leave behind.
    pub fn handoff_file(&self, game: GameId) -> PathBuf {
        self.data_root
            .join(format!("{}_last_score.txt", game.as_str()))
    }

    /// Path to the aggregate play-statistics file (one line per game).
    pub fn stats_file(&self) -> PathBuf {
        self.data_root.join("launcher-stats")
    }

    /// Ensures the data directory exists.
    pub fn ensure_data_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.data_root).map_err(|source| LauncherError::Io {
            context: format!("creating data directory {}", self.data_root.display()),
            source,
        })
    }
}

/// Full-rewrite save through a temp file + rename, so a crash mid-write
/// never leaves a partial file behind.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path.parent().ok_or_else(|| LauncherError::Io {
        context: format!("{} has no parent directory", path.display()),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "no parent directory"),
    })?;

    let result = (|| -> std::io::Result<()> {
        let mut tmp = NamedTempFile::new_in(parent)?;
        tmp.write_all(contents.as_bytes())?;
        tmp.flush()?;
        tmp.persist(path).map_err(|err| err.error)?;
        Ok(())
    })();

    result.map_err(|source| LauncherError::PersistenceWriteFailed {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config() -> StorageConfig {
        StorageConfig::with_roots(PathBuf::from("/opt/games"), PathBuf::from("/var/launcher"))
    }

    #[test]
    fn test_default_roots_are_per_user() {
        let config = StorageConfig::default();
        assert!(config.games_root().ends_with("matthew-smith-games-enhanced"));
        assert!(config.data_root().ends_with(".config/matthew-smith-games"));
    }

    #[test]
    fn test_game_executable_paths() {
        let config = config();
        assert_eq!(
            config.game_executable(GameId::Manic),
            PathBuf::from("/opt/games/ManicMiner/manicminer")
        );
        assert_eq!(
            config.game_executable(GameId::JetSet),
            PathBuf::from("/opt/games/JetSetWilly/jetsetwilly")
        );
    }

    #[test]
    fn test_game_executable_is_deterministic() {
        let config = config();
        assert_eq!(
            config.game_executable(GameId::Manic),
            config.game_executable(GameId::Manic)
        );
    }

    #[test]
    fn test_scores_file_path() {
        assert_eq!(
            config().scores_file(GameId::Manic),
            PathBuf::from("/var/launcher/manic_scores.txt")
        );
    }

    #[test]
    fn test_handoff_file_path() {
        assert_eq!(
            config().handoff_file(GameId::JetSet),
            PathBuf::from("/var/launcher/jetset_last_score.txt")
        );
    }

    #[test]
    fn test_stats_file_path() {
        assert_eq!(
            config().stats_file(),
            PathBuf::from("/var/launcher/launcher-stats")
        );
    }

    #[test]
    fn test_ensure_data_dir_creates_directory() {
        let temp = TempDir::new().unwrap();
        let config = StorageConfig::with_roots(
            temp.path().join("games"),
            temp.path().join("state").join("launcher"),
        );
        config.ensure_data_dir().unwrap();
        assert!(config.data_root().is_dir());
    }

    #[test]
    fn test_write_atomic_replaces_contents() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("scores.txt");
        write_atomic(&path, "first\n").unwrap();
        write_atomic(&path, "second\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second\n");
    }

    #[test]
    fn test_write_atomic_missing_directory_reports_write_failure() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nope").join("scores.txt");
        let err = write_atomic(&path, "data").unwrap_err();
        assert!(matches!(
            err,
            LauncherError::PersistenceWriteFailed { .. }
        ));
    }
}
