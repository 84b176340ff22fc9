// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `runbox daemon` - Daemon management commands

use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::Subcommand;

use crate::client::DaemonClient;

#[derive(Subcommand)]
pub enum DaemonCommand {
    /// Start the daemon (foreground or background)
    Start {
        /// Run in foreground (useful for debugging)
        #[arg(long)]
        foreground: bool,
    },
    /// Stop the daemon
    Stop,
    /// Check daemon status
    Status,
}

pub async fn daemon(command: DaemonCommand) -> Result<i32> {
    match command {
        DaemonCommand::Start { foreground } => start(foreground).await,
        DaemonCommand::Stop => stop().await,
        DaemonCommand::Status => super::status().await,
    }
}

async fn start(foreground: bool) -> Result<i32> {
    let runboxd_path = find_runboxd_binary();

    if foreground {
        // Run daemon in foreground - spawn and wait
        let status = Command::new(&runboxd_path).status()?;
        return Ok(status.code().unwrap_or(1));
    }

    let client = DaemonClient::from_env()?;

    // Check if already running
    if client.ping().await.is_ok() {
        println!("Daemon already running");
        return Ok(0);
    }

    // Start in background and verify it comes up
    let mut child = Command::new(&runboxd_path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| anyhow!("failed to spawn {}: {e}", runboxd_path.display()))?;

    for _ in 0..50 {
        if client.ping().await.is_ok() {
            println!("Daemon started");
            return Ok(0);
        }
        if let Some(status) = child.try_wait()? {
            return Err(anyhow!("daemon exited during startup with status: {status}"));
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    Err(anyhow!("daemon did not become ready in time"))
}

async fn stop() -> Result<i32> {
    let client = DaemonClient::from_env()?;
    if client.shutdown().await? {
        println!("Daemon stopped");
    } else {
        println!("Daemon not running");
    }
    Ok(0)
}

/// Look for runboxd next to the current executable, falling back to PATH.
fn find_runboxd_binary() -> PathBuf {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let sibling = dir.join("runboxd");
            if sibling.exists() {
                return sibling;
            }
        }
    }
    PathBuf::from("runboxd")
}
