// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod daemon;

use std::io::Write;

use anyhow::Result;

use runbox_core::{LogRecord, OutputEvent};
use runbox_wire::Response;

use crate::client::{DaemonClient, ExecVerdict};

/// `runbox exec` — run a command in the sandbox, relaying output live and
/// exiting with the command's own exit code.
pub async fn exec(command: &str) -> Result<i32> {
    let client = DaemonClient::from_env()?;

    let verdict = client
        .execute(command, |event| match event {
            OutputEvent::Stdout { chunk } => {
                print!("{chunk}");
                let _ = std::io::stdout().flush();
            }
            OutputEvent::Stderr { chunk } => {
                eprint!("{chunk}");
                let _ = std::io::stderr().flush();
            }
            OutputEvent::Completed { .. } | OutputEvent::Failed { .. } => {}
        })
        .await?;

    match verdict {
        ExecVerdict::Completed { exit_code, .. } => Ok(exit_code),
        ExecVerdict::Failed(message) => {
            eprintln!("runbox: execution failed: {message}");
            Ok(1)
        }
        ExecVerdict::Rejected(reason) => {
            eprintln!("runbox: command rejected: {reason}");
            Ok(1)
        }
        ExecVerdict::Busy => {
            eprintln!("runbox: daemon busy: another command is currently executing");
            Ok(1)
        }
    }
}

/// `runbox generate` — turn a prompt into a command via the daemon's stub.
pub async fn generate(prompt: &str) -> Result<i32> {
    let client = DaemonClient::from_env()?;
    match client.generate(prompt).await? {
        Response::Generated { command, note, .. } => {
            println!("{command}");
            eprintln!("note: {note}");
            Ok(0)
        }
        Response::Error { message } => {
            eprintln!("runbox: {message}");
            Ok(1)
        }
        other => {
            eprintln!("runbox: unexpected response: {other:?}");
            Ok(1)
        }
    }
}

/// `runbox history` — print the execution history, newest first.
pub async fn history() -> Result<i32> {
    let client = DaemonClient::from_env()?;
    let records = client.history().await?;

    if records.is_empty() {
        println!("No executions recorded");
        return Ok(0);
    }

    println!("{:<20}  {:<7}  {:>4}  {:>8}  COMMAND", "WHEN", "STATUS", "EXIT", "MS");
    for record in &records {
        println!("{}", format_record_line(record));
    }
    Ok(0)
}

/// `runbox status` — liveness probe.
pub async fn status() -> Result<i32> {
    let client = DaemonClient::from_env()?;
    match client.status().await {
        Ok((executing, uptime_secs, timestamp)) => {
            println!("daemon: ok (uptime {uptime_secs}s, executing: {executing}, at {timestamp})");
            Ok(0)
        }
        Err(crate::client::ClientError::NotRunning(_)) => {
            println!("daemon: not running");
            Ok(1)
        }
        Err(e) => Err(e.into()),
    }
}

fn format_record_line(record: &LogRecord) -> String {
    let status = match record.status {
        runbox_core::ExecStatus::Success => "success",
        runbox_core::ExecStatus::Failed => "failed",
        runbox_core::ExecStatus::Error => "error",
    };
    let exit = record.exit_code.map_or_else(|| "-".to_string(), |c| c.to_string());
    format!(
        "{:<20}  {:<7}  {:>4}  {:>8}  {}",
        record.timestamp.format("%Y-%m-%d %H:%M:%S"),
        status,
        exit,
        record.duration_ms,
        record.command,
    )
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
