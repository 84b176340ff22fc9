//! Single-flight specs
//!
//! At most one subprocess runs at a time; concurrent submissions are
//! rejected with Busy, not queued.

use crate::prelude::*;
use serial_test::serial;

#[test]
#[serial]
fn second_submission_is_busy_while_first_is_running() {
    let daemon = Daemon::start();

    let mut long_running = daemon.runbox_spawn(&["exec", "--", "sleep", "5"]);

    // Wait until the daemon reports an execution in flight.
    let running = wait_for(SPEC_WAIT_MAX_MS, || {
        daemon.runbox(&["status"]).stdout.contains("executing: true")
    });
    assert!(running, "first execution never reached the running state");

    daemon
        .runbox(&["exec", "--", "echo", "queued?"])
        .fails()
        .stderr_has("busy");

    let _ = long_running.kill();
    let _ = long_running.wait();
}

#[test]
#[serial]
fn slot_frees_after_completion() {
    let daemon = Daemon::start();

    daemon.runbox(&["exec", "--", "echo", "one"]).passes();
    daemon.runbox(&["exec", "--", "echo", "two"]).passes();

    daemon.runbox(&["status"]).passes().stdout_has("executing: false");
}

#[test]
#[serial]
fn many_concurrent_submissions_admit_exactly_one() {
    let daemon = Daemon::start();

    let mut children: Vec<_> =
        (0..4).map(|_| daemon.runbox_spawn(&["exec", "--", "sleep", "5"])).collect();

    let mut accepted = 0;
    let mut busy = 0;
    for child in children.drain(..) {
        let output = child.wait_with_output().expect("collect child");
        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.contains("busy") {
            busy += 1;
        } else if output.status.success() {
            accepted += 1;
        }
    }

    assert_eq!(accepted, 1, "exactly one submission should run");
    assert_eq!(busy, 3, "the rest should be rejected with busy");
}
