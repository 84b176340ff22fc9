//! Timeout specs
//!
//! A command that outlives the deadline is killed, reported as a timeout,
//! and still logged with whatever it produced.

use crate::prelude::*;
use serial_test::serial;
use std::time::{Duration, Instant};

#[test]
#[serial]
fn sleeping_past_the_deadline_times_out_within_bounded_grace() {
    let daemon = Daemon::start_with_env(&[("RUNBOX_EXEC_TIMEOUT_MS", "500")]);

    let start = Instant::now();
    daemon
        .runbox(&["exec", "--", "sleep", "30"])
        .fails()
        .stderr_has("timed out");

    // Deadline (0.5s) + SIGTERM grace (2s) + generous headroom.
    assert!(
        start.elapsed() < Duration::from_secs(8),
        "timeout took {:?}",
        start.elapsed()
    );

    let history = daemon.history_json();
    let records = history.as_array().expect("history should be a JSON array");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["status"], "error");
    assert_eq!(records[0]["exit_code"], serde_json::Value::Null);
    assert!(records[0]["error"]
        .as_str()
        .is_some_and(|e| e.contains("timed out")));
}

#[test]
#[serial]
fn slot_is_free_after_a_timeout() {
    let daemon = Daemon::start_with_env(&[("RUNBOX_EXEC_TIMEOUT_MS", "300")]);

    daemon.runbox(&["exec", "--", "sleep", "30"]).fails();
    daemon.runbox(&["exec", "--", "echo", "alive"]).passes().stdout_has("alive");
}
