// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The denylist rule table.

use regex::Regex;
use std::sync::LazyLock;

/// One denylist entry: a regex over raw command text and the reason
/// reported when it matches.
#[derive(Debug, Clone, Copy)]
pub struct DenyRule {
    pub pattern: &'static str,
    pub reason: &'static str,
}

/// Patterns rejected outright, checked in order. Kept declarative so the
/// test suite can assert coverage rule by rule.
pub const DENY_RULES: &[DenyRule] = &[
    DenyRule { pattern: r"rm\s+-rf\s+/", reason: "recursive deletion from the filesystem root" },
    DenyRule { pattern: r":\(\)\{\s*:\|:&\s*\};:", reason: "fork bomb" },
    DenyRule { pattern: r"shutdown", reason: "system shutdown" },
    DenyRule { pattern: r"reboot", reason: "system reboot" },
    DenyRule { pattern: r"halt", reason: "system halt" },
    DenyRule { pattern: r"poweroff", reason: "system poweroff" },
    DenyRule { pattern: r"init\s+0", reason: "runlevel switch to halt" },
    DenyRule { pattern: r"init\s+6", reason: "runlevel switch to reboot" },
    DenyRule { pattern: r"killall", reason: "bulk process kill" },
    DenyRule { pattern: r"pkill.*-9", reason: "forced bulk process kill" },
    DenyRule { pattern: r"dd\s+if=", reason: "raw disk copy" },
    DenyRule { pattern: r"mkfs\.", reason: "filesystem formatting" },
    DenyRule { pattern: r"fdisk", reason: "disk partitioning" },
    DenyRule { pattern: r">\s*/dev/sd", reason: "write to a raw disk device" },
    DenyRule { pattern: r"chmod\s+777", reason: "world-writable permission change" },
    DenyRule { pattern: r"chown\s+root", reason: "ownership change to root" },
    DenyRule { pattern: r"sudo", reason: "privilege escalation via sudo" },
    DenyRule { pattern: r"su\s", reason: "privilege escalation via su" },
    DenyRule { pattern: r"wget.*\|.*sh", reason: "download piped into a shell" },
    DenyRule { pattern: r"curl.*\|.*sh", reason: "download piped into a shell" },
    DenyRule { pattern: r"eval.*\$", reason: "dynamic evaluation of variable content" },
    DenyRule { pattern: r"exec.*\$", reason: "dynamic execution of variable content" },
];

/// Absolute-path prefixes considered safe to reference.
///
/// KNOWN-WEAK: the gate checks these via substring containment, not prefix
/// matching, so `/usr/bin` appearing anywhere in the text whitelists the
/// whole command. Kept as-is; see the crate docs.
pub const SAFE_PATH_PREFIXES: &[&str] = &["/usr/bin", "/bin", "/tmp"];

/// The compiled rule table. A pattern that fails to compile is skipped;
/// the `all_deny_patterns_compile` test guarantees none do.
pub(crate) static COMPILED_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    DENY_RULES
        .iter()
        .filter_map(|rule| Regex::new(rule.pattern).ok().map(|re| (re, rule.reason)))
        .collect()
});

#[cfg(test)]
#[path = "rules_tests.rs"]
mod tests;
