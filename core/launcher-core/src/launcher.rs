//! Session lifecycle management.
//!
//! `SessionLauncher` owns the score and stats stores and tracks which games
//! currently have a running process. Per game the lifecycle is
//! Idle -> Launching -> Running -> Completing -> Idle; different games may
//! run concurrently, but a second launch of the same game is refused while
//! its session is active.
//!
//! Two launch models are offered. `launch_blocking` suits front-ends that
//! suspend themselves while the game runs (the terminal menu). `launch_async`
//! suits event-loop front-ends: it spawns the process, waits on a background
//! thread, and delivers a single [`SessionFinished`] over the caller's
//! channel, which the caller feeds back to [`SessionLauncher::complete`] on
//! its own control thread.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Command;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};
use fs_err as fs;
use tracing::{info, warn};

use crate::error::{LauncherError, Result};
use crate::handoff::{self, DEFAULT_PLAYER_NAME};
use crate::scores::ScoreStore;
use crate::stats::StatsStore;
use crate::storage::StorageConfig;
use crate::types::{GameId, GameStats, ScoreEntry, SessionFinished, SessionReport};

struct Session {
    executable: PathBuf,
    started_at: DateTime<Utc>,
}

/// Owns all launcher state: persisted stores plus the set of live sessions.
///
/// Not `Sync`: front-ends keep one instance on their control thread and feed
/// completion messages back into it. Only the wait in `launch_async` runs
/// elsewhere, and that thread touches nothing but its own child handle.
pub struct SessionLauncher {
    config: StorageConfig,
    scores: ScoreStore,
    stats: StatsStore,
    active: HashMap<GameId, Session>,
}

impl SessionLauncher {
    /// Creates the data directory, loads both stores, and sweeps any
    /// hand-off files left over from a crashed session.
    pub fn new(config: StorageConfig) -> Result<Self> {
        config.ensure_data_dir()?;
        let mut launcher = Self {
            scores: ScoreStore::load(config.clone()),
            stats: StatsStore::load(config.clone()),
            config,
            active: HashMap::new(),
        };
        for (game, err) in launcher.check_pending_handoffs() {
            warn!(game = %game, error = %err, "Failed to ingest leftover hand-off");
        }
        Ok(launcher)
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    pub fn is_active(&self, game: GameId) -> bool {
        self.active.contains_key(&game)
    }

    /// Resolves and validates a game's executable without launching it.
    /// Front-ends call this to grey out cards for games not yet built.
    pub fn precheck(&self, game: GameId) -> Result<PathBuf> {
        if self.is_active(game) {
            return Err(LauncherError::SessionAlreadyActive(game));
        }
        let executable = self.config.game_executable(game);
        if !is_executable_file(&executable) {
            return Err(LauncherError::ExecutableNotFound(executable));
        }
        Ok(executable)
    }

    /// Runs a full session synchronously: spawn, wait for exit, then
    /// complete. Returns once the game process has exited and its score and
    /// statistics have been folded in.
    pub fn launch_blocking(&mut self, game: GameId) -> Result<SessionReport> {
        let executable = self.precheck(game)?;
        let started_at = Utc::now();
        info!(game = %game, path = %executable.display(), "Launching session");
        self.active.insert(
            game,
            Session {
                executable: executable.clone(),
                started_at,
            },
        );

        let status = Command::new(&executable).status().map_err(|source| {
            self.active.remove(&game);
            LauncherError::LaunchFailed { game, source }
        })?;

        Ok(self.complete(&SessionFinished {
            game,
            started_at,
            ended_at: Utc::now(),
            exit_code: status.code(),
        }))
    }

    /// Spawns the game and returns immediately. A background thread waits
    /// for the process and sends exactly one [`SessionFinished`] on `tx`;
    /// the caller must pass it to [`SessionLauncher::complete`].
    pub fn launch_async(&mut self, game: GameId, tx: mpsc::Sender<SessionFinished>) -> Result<()> {
        let executable = self.precheck(game)?;
        let started_at = Utc::now();
        info!(game = %game, path = %executable.display(), "Launching session");

        let mut child = Command::new(&executable).spawn().map_err(|source| {
            LauncherError::LaunchFailed { game, source }
        })?;
        self.active.insert(
            game,
            Session {
                executable,
                started_at,
            },
        );

        thread::spawn(move || {
            let exit_code = match child.wait() {
                Ok(status) => status.code(),
                Err(err) => {
                    warn!(game = %game, error = %err, "Waiting on game process failed");
                    None
                }
            };
            let finished = SessionFinished {
                game,
                started_at,
                ended_at: Utc::now(),
                exit_code,
            };
            if tx.send(finished).is_err() {
                warn!(game = %game, "Session receiver dropped before completion");
            }
        });
        Ok(())
    }

    /// Finishes a session: records statistics, ingests any hand-off score,
    /// and returns the game to Idle.
    ///
    /// Statistics are recorded whatever the exit code was; a crash after
    /// twenty minutes of play is still twenty minutes of play. Persistence
    /// and hand-off failures are logged rather than returned, since the
    /// in-memory state has already absorbed the session.
    pub fn complete(&mut self, finished: &SessionFinished) -> SessionReport {
        let game = finished.game;
        if self.active.remove(&game).is_none() {
            warn!(game = %game, "Completion for a session not marked active");
        }

        let duration = (finished.ended_at - finished.started_at)
            .to_std()
            .unwrap_or(Duration::ZERO);

        if let Err(err) = self.stats.record_session(game, duration, finished.ended_at) {
            warn!(game = %game, error = %err, "Failed to persist play statistics");
        }

        let ingested_score = match handoff::check_and_ingest(&self.config, &mut self.scores, game)
        {
            Ok(entry) => entry,
            Err(err) => {
                warn!(game = %game, error = %err, "Failed to ingest hand-off score");
                None
            }
        };

        info!(
            game = %game,
            exit_code = ?finished.exit_code,
            duration_secs = duration.as_secs(),
            "Session complete"
        );
        SessionReport {
            game,
            exit_code: finished.exit_code,
            duration,
            ended_at: finished.ended_at,
            ingested_score,
        }
    }

    /// Ingests any hand-off files currently on disk, for all games. Returns
    /// the failures; successes are logged inside the ingestion itself.
    pub fn check_pending_handoffs(&mut self) -> Vec<(GameId, LauncherError)> {
        let mut failures = Vec::new();
        for game in GameId::ALL {
            if let Err(err) = handoff::check_and_ingest(&self.config, &mut self.scores, game) {
                failures.push((game, err));
            }
        }
        failures
    }

    /// Adds a score under the given name. A blank name becomes
    /// [`DEFAULT_PLAYER_NAME`].
    pub fn submit_score(&mut self, game: GameId, name: &str, value: i64) -> Result<ScoreEntry> {
        let name = name.trim();
        let name = if name.is_empty() {
            DEFAULT_PLAYER_NAME
        } else {
            name
        };
        self.scores.add(game, name, value)
    }

    pub fn scores(&self, game: GameId) -> &[ScoreEntry] {
        self.scores.entries(game)
    }

    pub fn top_scores(&self, game: GameId, n: usize) -> &[ScoreEntry] {
        self.scores.top(game, n)
    }

    pub fn stats(&self, game: GameId) -> &GameStats {
        self.stats.get(game)
    }

    pub fn stats_all(&self) -> &[GameStats] {
        self.stats.all()
    }
}

/// A launchable game is a regular file with any execute bit set.
fn is_executable_file(path: &std::path::Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    match fs::metadata(path) {
        Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}
