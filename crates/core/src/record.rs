// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution history records and output truncation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of records kept in the execution history.
pub const HISTORY_CAP: usize = 100;

/// Maximum stored length of each captured stream, in characters.
pub const OUTPUT_CAP: usize = 10_000;

/// Marker appended to capped output.
pub const TRUNCATION_MARKER: &str = "\n... (truncated)";

/// Terminal classification of one execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecStatus {
    /// Process ran and exited zero.
    Success,
    /// Process ran and exited non-zero.
    Failed,
    /// Process could not be started, or was killed by the timeout.
    Error,
}

/// One entry in the execution history. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// When the execution finished.
    pub timestamp: DateTime<Utc>,
    /// The submitted command text, verbatim.
    pub command: String,
    pub status: ExecStatus,
    /// Exit code of the process; `None` when it never ran or was killed.
    #[serde(default)]
    pub exit_code: Option<i32>,
    /// Captured stdout, capped at [`OUTPUT_CAP`] characters.
    pub output: String,
    /// Captured stderr (or the failure message), capped at [`OUTPUT_CAP`].
    pub error: String,
    pub duration_ms: u64,
}

impl LogRecord {
    /// Build a record from accumulated execution results, applying the
    /// output cap to both streams.
    pub fn new(
        timestamp: DateTime<Utc>,
        command: impl Into<String>,
        status: ExecStatus,
        exit_code: Option<i32>,
        output: &str,
        error: &str,
        duration_ms: u64,
    ) -> Self {
        Self {
            timestamp,
            command: command.into(),
            status,
            exit_code,
            output: truncate_output(output),
            error: truncate_output(error),
            duration_ms,
        }
    }
}

/// Cap `output` at [`OUTPUT_CAP`] characters, appending [`TRUNCATION_MARKER`]
/// when the cap is exceeded. Output at or under the cap is returned verbatim.
///
/// The cut point is backed off to a UTF-8 character boundary so capped
/// output is always valid text.
pub fn truncate_output(output: &str) -> String {
    if output.len() <= OUTPUT_CAP {
        return output.to_string();
    }
    let mut end = OUTPUT_CAP;
    while end > 0 && !output.is_char_boundary(end) {
        end -= 1;
    }
    let mut truncated = output[..end].to_string();
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
