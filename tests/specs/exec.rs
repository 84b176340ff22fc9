//! Execution pipeline specs
//!
//! Admission, streaming, exit codes, and history recording through the
//! real binaries.

use crate::prelude::*;

#[test]
fn ls_in_empty_sandbox_streams_total_zero_and_exits_zero() {
    let daemon = Daemon::start();

    daemon
        .runbox(&["exec", "--", "ls", "-la"])
        .passes()
        .stdout_has("total 0");
}

#[test]
fn nonzero_exit_code_is_propagated() {
    let daemon = Daemon::start();

    let result = daemon.runbox(&["exec", "false"]);
    assert_eq!(result.code, 1);
}

#[test]
fn rejected_command_leaves_no_history_entry() {
    let daemon = Daemon::start();

    daemon
        .runbox(&["exec", "--", "sudo", "rm", "-rf", "/"])
        .fails()
        .stderr_has("rejected")
        .stderr_has("dangerous pattern");

    daemon.runbox(&["history"]).passes().stdout_has("No executions recorded");
    assert_eq!(daemon.history_json().as_array().map(Vec::len), Some(0));
}

#[test]
fn traversal_is_rejected() {
    let daemon = Daemon::start();

    daemon
        .runbox(&["exec", "--", "cat", "../outside.txt"])
        .fails()
        .stderr_has("traversal");
}

#[test]
fn missing_executable_reports_failure_and_logs_error_status() {
    let daemon = Daemon::start();

    daemon
        .runbox(&["exec", "definitely-not-a-real-command-xyz"])
        .fails()
        .stderr_has("execution failed");

    let history = daemon.history_json();
    let records = history.as_array().expect("history should be a JSON array");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["status"], "error");
}

#[test]
fn successful_execution_appends_a_success_record() {
    let daemon = Daemon::start();

    daemon.runbox(&["exec", "--", "echo", "recorded"]).passes().stdout_has("recorded");

    daemon
        .runbox(&["history"])
        .passes()
        .stdout_has("echo recorded")
        .stdout_has("success");

    let history = daemon.history_json();
    let records = history.as_array().expect("history should be a JSON array");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["command"], "echo recorded");
    assert_eq!(records[0]["status"], "success");
    assert_eq!(records[0]["exit_code"], 0);
}

#[test]
fn history_is_newest_first() {
    let daemon = Daemon::start();

    daemon.runbox(&["exec", "--", "echo", "first"]).passes();
    daemon.runbox(&["exec", "--", "echo", "second"]).passes();

    let history = daemon.history_json();
    let records = history.as_array().expect("history should be a JSON array");
    assert_eq!(records[0]["command"], "echo second");
    assert_eq!(records[1]["command"], "echo first");
}

#[test]
fn commands_run_inside_the_sandbox_directory() {
    let daemon = Daemon::start();
    std::fs::write(daemon.sandbox_dir().join("planted.txt"), b"x").expect("plant file");

    daemon.runbox(&["exec", "ls"]).passes().stdout_has("planted.txt");
}
