// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! runbox — CLI client for the Runbox daemon.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod client;
mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "runbox", version, about = "Sandboxed command runner")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate and execute a command in the sandbox, streaming output live
    Exec {
        /// The command to run, e.g. `runbox exec -- ls -la`
        #[arg(trailing_var_arg = true, required = true)]
        command: Vec<String>,
    },

    /// Generate a shell command from a natural-language prompt
    Generate {
        #[arg(trailing_var_arg = true, required = true)]
        prompt: Vec<String>,
    },

    /// Show the execution history, newest first
    History,

    /// Probe daemon liveness
    Status,

    /// Manage the daemon
    Daemon {
        #[command(subcommand)]
        command: commands::daemon::DaemonCommand,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("runbox: {e}");
            1
        }
    };
    std::process::exit(code);
}

async fn run(cli: Cli) -> anyhow::Result<i32> {
    match cli.command {
        Command::Exec { command } => commands::exec(&command.join(" ")).await,
        Command::Generate { prompt } => commands::generate(&prompt.join(" ")).await,
        Command::History => commands::history().await,
        Command::Status => commands::status().await,
        Command::Daemon { command } => commands::daemon::daemon(command).await,
    }
}
