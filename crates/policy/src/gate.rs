// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The admission check itself.

use thiserror::Error;

use crate::rules::{COMPILED_RULES, SAFE_PATH_PREFIXES};

/// Why a command was refused admission. The Display string is the reason
/// reported to the caller and names the rule that fired.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("command must be a non-empty string")]
    Empty,

    #[error("command contains dangerous pattern: {reason}")]
    Denied { reason: &'static str },

    #[error("command contains path traversal attempt (..)")]
    Traversal,

    #[error("command contains absolute paths outside sandbox")]
    AbsolutePath,
}

/// Decide whether `command` may be executed. Pure and deterministic;
/// rules apply in order and the first match rejects.
pub fn admit(command: &str) -> Result<(), PolicyError> {
    if command.trim().is_empty() {
        return Err(PolicyError::Empty);
    }

    for (pattern, reason) in COMPILED_RULES.iter() {
        if pattern.is_match(command) {
            return Err(PolicyError::Denied { reason });
        }
    }

    if command.contains("..") {
        return Err(PolicyError::Traversal);
    }

    if references_absolute_path(command) {
        let has_safe_path = SAFE_PATH_PREFIXES.iter().any(|prefix| command.contains(prefix));
        if !has_safe_path && (command.starts_with('/') || has_path_argument(command)) {
            return Err(PolicyError::AbsolutePath);
        }
    }

    Ok(())
}

/// Whether the text references an absolute path at all, either as the
/// leading token or anywhere after a space.
fn references_absolute_path(command: &str) -> bool {
    command.trim_start().starts_with('/') || command.contains(" /")
}

/// Whitespace immediately followed by `/` — an absolute path in argument
/// position.
fn has_path_argument(command: &str) -> bool {
    command
        .as_bytes()
        .windows(2)
        .any(|pair| pair[0].is_ascii_whitespace() && pair[1] == b'/')
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;
