//! Core library for the Matthew Smith game launchers.
//!
//! Everything the front-ends share lives here: resolving where the game
//! builds and persisted state live ([`storage`]), the high-score tables
//! ([`scores`]), aggregate play statistics ([`stats`]), ingestion of the
//! score hand-off files the games write on exit ([`handoff`]), and the
//! session lifecycle itself ([`launcher`]). Front-ends stay thin: they
//! render state and forward user intent into a [`SessionLauncher`].

pub mod error;
pub mod handoff;
pub mod launcher;
pub mod scores;
pub mod stats;
pub mod storage;
pub mod types;

pub use error::{LauncherError, Result};
pub use handoff::DEFAULT_PLAYER_NAME;
pub use launcher::SessionLauncher;
pub use scores::{ScoreStore, SCORE_TABLE_CAPACITY};
pub use stats::StatsStore;
pub use storage::StorageConfig;
pub use types::{GameId, GameStats, ScoreEntry, SessionFinished, SessionReport};
