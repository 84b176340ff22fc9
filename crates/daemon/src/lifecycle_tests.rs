// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

fn test_config(dir: &std::path::Path) -> Config {
    Config {
        state_dir: dir.to_path_buf(),
        socket_path: dir.join("daemon.sock"),
        lock_path: dir.join("daemon.pid"),
        history_path: dir.join("history.json"),
        sandbox_path: dir.join("sandbox"),
    }
}

#[tokio::test]
async fn startup_creates_sandbox_and_binds_socket() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let result = startup(&config).unwrap();

    assert!(config.sandbox_path.is_dir());
    assert!(config.socket_path.exists());
    assert!(config.lock_path.exists());
    assert!(!result.daemon.coordinator.is_executing());
}

#[tokio::test]
async fn second_startup_fails_on_held_lock() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let _first = startup(&config).unwrap();
    match startup(&config) {
        Err(LifecycleError::LockFailed(_)) => {}
        Err(other) => panic!("expected LockFailed, got {other:?}"),
        Ok(_) => panic!("expected LockFailed, got a running daemon"),
    }

    // The running daemon's files were not cleaned up by the failed start.
    assert!(config.socket_path.exists());
    assert!(config.lock_path.exists());
}

#[tokio::test]
async fn lock_file_contains_our_pid() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let _result = startup(&config).unwrap();

    let contents = std::fs::read_to_string(&config.lock_path).unwrap();
    assert_eq!(contents.trim(), std::process::id().to_string());
}

#[tokio::test]
async fn shutdown_removes_socket_and_pid_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let result = startup(&config).unwrap();
    result.daemon.shutdown();

    assert!(!config.socket_path.exists());
    assert!(!config.lock_path.exists());
}

#[tokio::test]
async fn stale_socket_is_replaced_on_startup() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    std::fs::write(&config.socket_path, b"stale").unwrap();
    let result = startup(&config);
    assert!(result.is_ok());
}

#[test]
#[serial]
fn config_load_uses_state_dir_override() {
    std::env::set_var("RUNBOX_STATE_DIR", "/tmp/runbox-config-test");
    let config = Config::load().unwrap();
    std::env::remove_var("RUNBOX_STATE_DIR");

    assert_eq!(config.state_dir, PathBuf::from("/tmp/runbox-config-test"));
    assert_eq!(config.socket_path, PathBuf::from("/tmp/runbox-config-test/daemon.sock"));
    assert_eq!(config.sandbox_path, PathBuf::from("/tmp/runbox-config-test/sandbox"));
}
