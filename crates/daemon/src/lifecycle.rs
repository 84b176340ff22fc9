// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup, shutdown, lock handling.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use fs2::FileExt;
use thiserror::Error;
use tokio::net::UnixListener;
use tokio::sync::Notify;
use tracing::{info, warn};

use runbox_core::SystemClock;

use crate::coordinator::{Coordinator, DaemonCoordinator};
use crate::env;
use crate::history::ExecutionLog;

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root state directory (e.g. ~/.local/state/runbox)
    pub state_dir: PathBuf,
    /// Path to Unix socket
    pub socket_path: PathBuf,
    /// Path to lock/PID file
    pub lock_path: PathBuf,
    /// Path to the execution history store
    pub history_path: PathBuf,
    /// The sandbox working directory all executions are confined to
    pub sandbox_path: PathBuf,
}

impl Config {
    /// Load configuration for the user-level daemon.
    ///
    /// Uses fixed paths under the resolved state directory. One daemon
    /// serves one user.
    pub fn load() -> Result<Self, LifecycleError> {
        let state_dir = env::state_dir()?;

        Ok(Self {
            socket_path: state_dir.join("daemon.sock"),
            lock_path: state_dir.join("daemon.pid"),
            history_path: state_dir.join("history.json"),
            sandbox_path: state_dir.join("sandbox"),
            state_dir,
        })
    }
}

/// Daemon state during operation.
///
/// The listener is returned separately from startup to be spawned as a task.
pub struct DaemonState {
    /// Configuration
    pub config: Config,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    /// The execution coordinator (shared with the listener)
    pub coordinator: Arc<DaemonCoordinator>,
    /// When the daemon started
    pub start_time: Instant,
}

/// Result of daemon startup - includes both the daemon state and the listener.
pub struct StartupResult {
    /// The daemon state
    pub daemon: DaemonState,
    /// The Unix socket listener to spawn as a task
    pub listener: UnixListener,
    /// Shutdown signal shared with the listener
    pub shutdown: Arc<Notify>,
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("Failed to bind socket at {0}: {1}")]
    BindFailed(PathBuf, std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Start the daemon
pub fn startup(config: &Config) -> Result<StartupResult, LifecycleError> {
    match startup_inner(config) {
        Ok(result) => Ok(result),
        Err(e) => {
            // Don't clean up if we failed to acquire the lock —
            // those files belong to the already-running daemon.
            if !matches!(e, LifecycleError::LockFailed(_)) {
                cleanup_on_failure(config);
            }
            Err(e)
        }
    }
}

fn startup_inner(config: &Config) -> Result<StartupResult, LifecycleError> {
    // 1. Create the state directory (needed for socket, lock, history)
    std::fs::create_dir_all(&config.state_dir)?;

    // 2. Acquire the lock file FIRST - prevents races.
    // Use OpenOptions to avoid truncating the file before we hold the lock,
    // which would wipe the running daemon's PID.
    let lock_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&config.lock_path)?;
    lock_file.try_lock_exclusive().map_err(LifecycleError::LockFailed)?;

    // Write PID to lock file (truncate now that we hold the lock)
    let mut lock_file = lock_file;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;
    let lock_file = lock_file; // Drop mutability

    // 3. Create the sandbox working directory
    std::fs::create_dir_all(&config.sandbox_path)?;

    // 4. Wire up the coordinator over the history store
    let history = ExecutionLog::new(config.history_path.clone());
    let existing = history.load().len();
    if existing > 0 {
        info!("loaded execution history: {existing} records");
    }
    let coordinator = Arc::new(Coordinator::new(
        history,
        config.sandbox_path.clone(),
        env::exec_timeout(),
        SystemClock,
    ));

    // 5. Remove stale socket and bind (LAST - only after all validation passes)
    if config.socket_path.exists() {
        std::fs::remove_file(&config.socket_path)?;
    }
    let listener = UnixListener::bind(&config.socket_path)
        .map_err(|e| LifecycleError::BindFailed(config.socket_path.clone(), e))?;

    info!("Daemon started");

    Ok(StartupResult {
        daemon: DaemonState {
            config: config.clone(),
            lock_file,
            coordinator,
            start_time: Instant::now(),
        },
        listener,
        shutdown: Arc::new(Notify::new()),
    })
}

impl DaemonState {
    /// Shutdown the daemon gracefully.
    ///
    /// An in-flight subprocess is not awaited; it is killed when the
    /// runner's child handle is dropped with the process.
    pub fn shutdown(&self) {
        info!("Shutting down daemon...");

        // 1. Remove socket file (listener task stops when the runtime exits)
        if self.config.socket_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.socket_path) {
                warn!("Failed to remove socket file: {}", e);
            }
        }

        // 2. Remove PID file
        if self.config.lock_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.lock_path) {
                warn!("Failed to remove PID file: {}", e);
            }
        }

        // 3. Lock file is released automatically when self.lock_file is dropped

        info!("Daemon shutdown complete");
    }
}

/// Clean up resources on startup failure
fn cleanup_on_failure(config: &Config) {
    if config.socket_path.exists() {
        let _ = std::fs::remove_file(&config.socket_path);
    }
    if config.lock_path.exists() {
        let _ = std::fs::remove_file(&config.lock_path);
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
