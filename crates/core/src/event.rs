// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Streamed execution events.

use serde::{Deserialize, Serialize};

/// One event in the output stream of a sandboxed execution.
///
/// Chunks from the same stream arrive in emission order; ordering between
/// stdout and stderr chunks is best-effort (the two pipes are drained
/// independently). Exactly one terminal variant ([`Completed`] or
/// [`Failed`]) ends every sequence.
///
/// [`Completed`]: OutputEvent::Completed
/// [`Failed`]: OutputEvent::Failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputEvent {
    /// A chunk of standard output, as read from the pipe.
    Stdout { chunk: String },

    /// A chunk of standard error, as read from the pipe.
    Stderr { chunk: String },

    /// The process exited on its own.
    Completed { exit_code: i32, duration_ms: u64 },

    /// The process could not be started, or was killed (timeout).
    Failed { message: String },
}

impl OutputEvent {
    /// Whether this event ends the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Failed { .. })
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
