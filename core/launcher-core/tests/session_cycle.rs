//! End-to-end session lifecycle tests using stub game executables.
//!
//! Each stub is a small shell script standing in for a game build. Scripts
//! that write a hand-off file exercise the full spawn, wait, ingest cycle.

use std::os::unix::fs::PermissionsExt;
use std::sync::mpsc;
use std::time::Duration;

use fs_err as fs;
use tempfile::TempDir;

use launcher_core::{
    GameId, LauncherError, SessionLauncher, StorageConfig, DEFAULT_PLAYER_NAME,
};

fn setup() -> (TempDir, StorageConfig) {
    let temp = TempDir::new().unwrap();
    let config = StorageConfig::with_roots(temp.path().join("games"), temp.path().join("data"));
    (temp, config)
}

/// Installs a shell script as a game's executable.
fn install_stub(config: &StorageConfig, game: GameId, body: &str) {
    let path = config.game_executable(game);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

#[test]
fn test_blocking_session_ingests_handoff_score() {
    let (_temp, config) = setup();
    let handoff = config.handoff_file(GameId::Manic);
    install_stub(
        &config,
        GameId::Manic,
        &format!("echo '340 340' > '{}'", handoff.display()),
    );

    let mut launcher = SessionLauncher::new(config).unwrap();
    let report = launcher.launch_blocking(GameId::Manic).unwrap();

    assert_eq!(report.game, GameId::Manic);
    assert_eq!(report.exit_code, Some(0));
    let ingested = report.ingested_score.unwrap();
    assert_eq!(ingested.value, 340);
    assert_eq!(ingested.name, DEFAULT_PLAYER_NAME);

    assert!(!launcher.is_active(GameId::Manic));
    assert!(!handoff.exists());
    assert_eq!(launcher.scores(GameId::Manic)[0].value, 340);
    assert_eq!(launcher.stats(GameId::Manic).play_count, 1);
}

#[test]
fn test_nonzero_exit_still_records_statistics() {
    let (_temp, config) = setup();
    install_stub(&config, GameId::JetSet, "exit 2");

    let mut launcher = SessionLauncher::new(config).unwrap();
    let report = launcher.launch_blocking(GameId::JetSet).unwrap();

    assert_eq!(report.exit_code, Some(2));
    assert!(report.ingested_score.is_none());
    assert_eq!(launcher.stats(GameId::JetSet).play_count, 1);
    assert!(launcher.stats(GameId::JetSet).last_played.is_some());
}

#[test]
fn test_async_session_delivers_one_completion() {
    let (_temp, config) = setup();
    let handoff = config.handoff_file(GameId::Manic);
    install_stub(
        &config,
        GameId::Manic,
        &format!("echo '1500 1500' > '{}'", handoff.display()),
    );

    let mut launcher = SessionLauncher::new(config).unwrap();
    let (tx, rx) = mpsc::channel();
    launcher.launch_async(GameId::Manic, tx).unwrap();
    assert!(launcher.is_active(GameId::Manic));

    let finished = rx.recv_timeout(Duration::from_secs(10)).unwrap();
    assert_eq!(finished.game, GameId::Manic);
    assert_eq!(finished.exit_code, Some(0));

    let report = launcher.complete(&finished);
    assert_eq!(report.ingested_score.unwrap().value, 1500);
    assert!(!launcher.is_active(GameId::Manic));
    assert_eq!(launcher.stats(GameId::Manic).play_count, 1);

    // The wait thread sends exactly once.
    assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
}

#[test]
fn test_second_launch_of_active_game_is_refused() {
    let (_temp, config) = setup();
    install_stub(&config, GameId::Manic, "sleep 2");
    install_stub(&config, GameId::JetSet, "true");

    let mut launcher = SessionLauncher::new(config).unwrap();
    let (tx, rx) = mpsc::channel();
    launcher.launch_async(GameId::Manic, tx).unwrap();

    let err = launcher.launch_blocking(GameId::Manic).unwrap_err();
    assert!(matches!(err, LauncherError::SessionAlreadyActive(GameId::Manic)));

    // A different game is unaffected.
    let report = launcher.launch_blocking(GameId::JetSet).unwrap();
    assert_eq!(report.exit_code, Some(0));

    let finished = rx.recv_timeout(Duration::from_secs(10)).unwrap();
    launcher.complete(&finished);
    assert!(!launcher.is_active(GameId::Manic));
}

#[test]
fn test_state_survives_relaunch_of_the_launcher() {
    let (_temp, config) = setup();
    install_stub(&config, GameId::Manic, "exit 0");

    {
        let mut launcher = SessionLauncher::new(config.clone()).unwrap();
        launcher.launch_blocking(GameId::Manic).unwrap();
        launcher.submit_score(GameId::Manic, "Penrose", 7200).unwrap();
    }

    let launcher = SessionLauncher::new(config).unwrap();
    assert_eq!(launcher.stats(GameId::Manic).play_count, 1);
    assert_eq!(launcher.scores(GameId::Manic)[0].name, "Penrose");
    assert_eq!(launcher.scores(GameId::Manic)[0].value, 7200);
}

#[test]
fn test_corrupt_handoff_is_consumed_and_session_still_completes() {
    let (_temp, config) = setup();
    let handoff = config.handoff_file(GameId::Manic);
    install_stub(
        &config,
        GameId::Manic,
        &format!("echo 'garbage' > '{}'", handoff.display()),
    );

    let mut launcher = SessionLauncher::new(config).unwrap();
    let report = launcher.launch_blocking(GameId::Manic).unwrap();

    assert!(report.ingested_score.is_none());
    assert!(!handoff.exists());
    assert!(launcher.scores(GameId::Manic).is_empty());
    assert_eq!(launcher.stats(GameId::Manic).play_count, 1);
}
