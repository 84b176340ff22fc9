// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The execution history store.
//!
//! A single JSON file holding at most [`HISTORY_CAP`] records, newest
//! first. Persistence is atomic (write to a temp file, then rename) so a
//! crash mid-write leaves either the previous or the new complete state.
//! Reads are best-effort: a missing or unparseable store degrades to an
//! empty history, never an error — logging must not block execution.

use std::fs;
use std::path::PathBuf;

use thiserror::Error;
use tracing::warn;

use runbox_core::{LogRecord, HISTORY_CAP};

/// Errors from persisting the history. Load failures are not errors;
/// they degrade to an empty history.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Append-only bounded history store. Single writer: the coordinator's
/// finalizing step is the only caller of [`append`](Self::append), and
/// only one execution is ever in flight.
#[derive(Debug, Clone)]
pub struct ExecutionLog {
    path: PathBuf,
}

impl ExecutionLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load the history, newest first. Missing or corrupt stores load as
    /// empty.
    pub fn load(&self) -> Vec<LogRecord> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!("failed to read history store: {e}");
                return Vec::new();
            }
        };
        match serde_json::from_slice(&data) {
            Ok(records) => records,
            Err(e) => {
                warn!("history store is unparseable, starting empty: {e}");
                Vec::new()
            }
        }
    }

    /// Insert a record at the front, evict past [`HISTORY_CAP`], and
    /// persist atomically.
    pub fn append(&self, record: &LogRecord) -> Result<(), HistoryError> {
        let mut records = self.load();
        records.insert(0, record.clone());
        records.truncate(HISTORY_CAP);

        let data = serde_json::to_vec_pretty(&records)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &data)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
