// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Admission policy for submitted shell commands.
//!
//! The gate is a best-effort textual denylist, not a security boundary.
//! Rules match raw command text; shell metacharacters, quoting, and
//! indirection can construct commands that evade every pattern. That
//! limitation is accepted: the sandbox working directory, not this gate,
//! is the primary confinement mechanism, and the gate exists to stop the
//! obvious foot-guns before a process is ever spawned.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod gate;
mod rules;

pub use gate::{admit, PolicyError};
pub use rules::{DenyRule, DENY_RULES, SAFE_PATH_PREFIXES};
