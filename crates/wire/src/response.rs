// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use runbox_core::{LogRecord, OutputEvent};
use serde::{Deserialize, Serialize};

/// Response from daemon to CLI
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Response {
    Pong,

    Hello { version: String },

    /// Command admitted; event frames follow on this connection.
    Accepted,

    /// Command refused by the admission policy. No stream was opened and
    /// nothing was logged.
    Rejected { reason: String },

    /// Another command is currently executing. Not queued; retry later.
    Busy,

    /// One streamed execution event.
    Event { event: OutputEvent },

    Generated { command: String, prompt: String, note: String },

    History { records: Vec<LogRecord> },

    Status { ok: bool, executing: bool, uptime_secs: u64, timestamp: String },

    ShuttingDown,

    Error { message: String },
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
