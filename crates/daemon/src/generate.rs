// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Natural-language-to-command generation stub.
//!
//! Pure keyword matching, no state, no model. Generated commands go back
//! through the admission gate before they are returned, so generation can
//! never hand out something execution would refuse.

use thiserror::Error;

use runbox_policy::PolicyError;

/// Note attached to every generated command.
const STUB_NOTE: &str =
    "This is a stub implementation. TODO: Integrate a model for real command generation.";

/// Keyword sets and the command each one maps to, checked in order.
const KEYWORD_COMMANDS: &[(&[&str], &str)] = &[
    (&["list", "file"], "ls -la"),
    (&["git", "status"], "git status"),
    (&["node", "version"], "node --version"),
    (&["current", "directory"], "pwd"),
    (&["create", "file"], "touch example.txt && echo \"File created\" > example.txt"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedCommand {
    pub command: String,
    pub note: &'static str,
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("prompt is required")]
    EmptyPrompt,

    #[error("generated command failed validation: {0}")]
    FailedValidation(#[from] PolicyError),
}

/// Map a prompt to a command. All keywords of an entry must appear in the
/// lowercased prompt; the first matching entry wins. Prompts that match
/// nothing fall back to an echo of the prompt itself.
pub fn generate(prompt: &str) -> Result<GeneratedCommand, GenerateError> {
    if prompt.trim().is_empty() {
        return Err(GenerateError::EmptyPrompt);
    }

    let lowered = prompt.to_lowercase();
    let command = KEYWORD_COMMANDS
        .iter()
        .find(|(keywords, _)| keywords.iter().all(|k| lowered.contains(k)))
        .map(|(_, command)| (*command).to_string())
        .unwrap_or_else(|| format!("echo \"Command generated from: {prompt}\""));

    runbox_policy::admit(&command)?;

    Ok(GeneratedCommand { command, note: STUB_NOTE })
}

#[cfg(test)]
#[path = "generate_tests.rs"]
mod tests;
