//! Daemon lifecycle specs
//!
//! Verify startup, liveness, shutdown, and the single-daemon lock.

use crate::prelude::*;
use std::process::{Command, Stdio};

#[test]
fn daemon_serves_status_after_startup() {
    let daemon = Daemon::start();

    daemon
        .runbox(&["status"])
        .passes()
        .stdout_has("daemon: ok")
        .stdout_has("executing: false");
}

#[test]
fn daemon_stop_removes_socket_and_reports_not_running() {
    let daemon = Daemon::start();

    daemon.runbox(&["daemon", "stop"]).passes().stdout_has("Daemon stopped");

    let socket = daemon.state_dir().join("daemon.sock");
    assert!(
        wait_for(SPEC_WAIT_MAX_MS, || !socket.exists()),
        "socket not removed after stop"
    );

    daemon.runbox(&["status"]).fails().stdout_has("not running");
}

#[test]
fn second_daemon_refuses_to_start_on_held_lock() {
    let daemon = Daemon::start();

    let output = Command::new(bin_path("runboxd"))
        .env("RUNBOX_STATE_DIR", daemon.state_dir())
        .stdin(Stdio::null())
        .output()
        .expect("run second runboxd");

    assert!(!output.status.success(), "second daemon should refuse to start");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("lock"), "stderr should mention the lock: {stderr}");

    // The running daemon is unaffected.
    daemon.runbox(&["status"]).passes().stdout_has("daemon: ok");
}

#[test]
fn sandbox_directory_is_created_at_startup() {
    let daemon = Daemon::start();
    assert!(daemon.sandbox_dir().is_dir());
}

#[test]
fn generate_round_trips_through_the_daemon() {
    let daemon = Daemon::start();

    daemon
        .runbox(&["generate", "list", "the", "files"])
        .passes()
        .stdout_has("ls -la");
}
