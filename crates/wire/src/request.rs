// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};

/// Request from CLI to daemon
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum Request {
    /// Health check ping
    Ping,

    /// Version handshake
    Hello { version: String },

    /// Validate and execute a command in the sandbox.
    ///
    /// This is a stream-upgrading request: on admission the daemon replies
    /// with [`Response::Accepted`] and the connection carries a sequence of
    /// [`Response::Event`] frames, ending with exactly one terminal event.
    /// Rejection ([`Response::Rejected`] / [`Response::Busy`]) is a single
    /// frame and no stream is opened.
    ///
    /// [`Response::Accepted`]: crate::Response::Accepted
    /// [`Response::Event`]: crate::Response::Event
    /// [`Response::Rejected`]: crate::Response::Rejected
    /// [`Response::Busy`]: crate::Response::Busy
    Execute { command: String },

    /// Generate a command from a natural-language prompt
    Generate { prompt: String },

    /// Fetch the execution history, newest first
    History,

    /// Liveness probe
    Status,

    /// Request daemon shutdown
    Shutdown,
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
