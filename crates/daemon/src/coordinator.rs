// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The execution coordinator: admission, single-flight, finalization.
//!
//! One request at a time moves through Idle → Validating → Running →
//! Finalizing → Idle. Validation happens before the slot is taken; a
//! request that arrives while the slot is held is rejected outright with
//! Busy — there is no queue and no waiting.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, OwnedSemaphorePermit, Semaphore, TryAcquireError};
use tracing::{info, warn};

use runbox_core::{Clock, LogRecord, OutputEvent, SystemClock};
use runbox_policy::PolicyError;

use crate::history::ExecutionLog;
use crate::runner;

/// Coordinator with the real clock, as wired by the daemon.
pub type DaemonCoordinator = Coordinator<SystemClock>;

/// Why a submission did not start executing.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Refused by the admission policy; nothing was spawned or logged.
    #[error(transparent)]
    Rejected(#[from] PolicyError),

    /// The execution slot is held. Not queued; the caller may retry.
    #[error("another command is currently executing")]
    Busy,
}

/// An admitted command holding the execution slot. The permit is released
/// when the execution is driven to completion (or the value is dropped),
/// never earlier.
pub struct Execution {
    permit: OwnedSemaphorePermit,
    command: String,
}

pub struct Coordinator<C: Clock> {
    slot: Arc<Semaphore>,
    history: ExecutionLog,
    sandbox_dir: PathBuf,
    timeout: Duration,
    clock: C,
}

impl<C: Clock> Coordinator<C> {
    pub fn new(history: ExecutionLog, sandbox_dir: PathBuf, timeout: Duration, clock: C) -> Self {
        Self { slot: Arc::new(Semaphore::new(1)), history, sandbox_dir, timeout, clock }
    }

    /// Whether a subprocess is currently running.
    pub fn is_executing(&self) -> bool {
        self.slot.available_permits() == 0
    }

    pub fn history(&self) -> &ExecutionLog {
        &self.history
    }

    /// Validate a command and claim the execution slot.
    ///
    /// Both failure modes are synchronous and side-effect free: a rejected
    /// or busy submission opens no stream and writes no record.
    pub fn begin(&self, command: &str) -> Result<Execution, SubmitError> {
        runbox_policy::admit(command)?;

        let permit = match Arc::clone(&self.slot).try_acquire_owned() {
            Ok(permit) => permit,
            Err(TryAcquireError::NoPermits) => return Err(SubmitError::Busy),
            Err(TryAcquireError::Closed) => return Err(SubmitError::Busy),
        };

        info!(%command, "command admitted");
        Ok(Execution { permit, command: command.to_string() })
    }

    /// Drive an admitted execution to its terminal event, then finalize:
    /// build the log record from the accumulated output and append it.
    ///
    /// The slot is released when this returns — also on log-persistence
    /// failure and on a vanished event receiver — so one bad execution can
    /// never wedge future requests.
    pub async fn run(&self, execution: Execution, events: mpsc::Sender<OutputEvent>) {
        let Execution { permit: _permit, command } = execution;

        let outcome = runner::run(&command, &self.sandbox_dir, self.timeout, &events).await;
        // Close the stream: the terminal event is already out.
        drop(events);

        let error_text = match &outcome.failure {
            Some(message) if outcome.stderr.is_empty() => message.clone(),
            Some(message) => format!("{}\n{}", outcome.stderr, message),
            None => outcome.stderr.clone(),
        };
        let record = LogRecord::new(
            self.clock.now_utc(),
            &command,
            outcome.status,
            outcome.exit_code,
            &outcome.stdout,
            &error_text,
            outcome.duration_ms,
        );

        if let Err(e) = self.history.append(&record) {
            // Logging is best-effort; the execution outcome stands.
            warn!("failed to persist execution record: {e}");
        }
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
