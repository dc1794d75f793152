//! Error types for launcher-core operations.

use std::path::PathBuf;

use crate::types::GameId;

/// All errors that can occur in launcher-core operations.
///
/// Every variant is a local, recoverable condition: front-ends render these
/// as user-facing messages and the launcher process keeps running. Only a
/// data directory that cannot be created at startup is worth aborting over,
/// and that decision belongs to the host.
#[derive(Debug, thiserror::Error)]
pub enum LauncherError {
    /// A front-end passed a game id string the launcher does not know.
    #[error("Unknown game id: {0}")]
    InvalidGameId(String),

    /// The resolved path does not exist or is not a regular executable file.
    /// The user needs to build the game first; nothing was mutated.
    #[error("Game executable not found at {0}")]
    ExecutableNotFound(PathBuf),

    /// The OS-level spawn itself failed. No statistics are recorded.
    #[error("Failed to launch {game}: {source}")]
    LaunchFailed {
        game: GameId,
        #[source]
        source: std::io::Error,
    },

    /// A launch was requested for a game whose session is still running.
    #[error("A session for {0} is already running")]
    SessionAlreadyActive(GameId),

    /// A score or stats file could not be written. The in-memory state
    /// remains authoritative; a later successful write reconciles the file.
    #[error("Failed to write {path}: {source}")]
    PersistenceWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The hand-off file existed but did not contain two integers.
    #[error("Hand-off file malformed: {path}: {details}")]
    HandoffParseFailed { path: PathBuf, details: String },

    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results using LauncherError.
pub type Result<T> = std::result::Result<T, LauncherError>;
