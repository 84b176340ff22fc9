// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess execution: spawn, stream, timeout, kill.
//!
//! The runner owns one subprocess for its whole lifetime. Both output
//! pipes are drained concurrently so a stall on one stream can never
//! deadlock the other against a full kernel buffer, and every chunk is
//! emitted as an [`OutputEvent`] the moment the read returns. Each drain
//! also accumulates its stream's full text, independent of what has been
//! relayed, for the execution log.

use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use runbox_core::{ExecStatus, OutputEvent};

/// Grace period between SIGTERM and SIGKILL on timeout.
const KILL_GRACE: Duration = Duration::from_secs(2);

/// Read size for each pipe drain; one event per OS read.
const READ_CHUNK: usize = 8192;

/// Terminal result of one runner invocation, with the accumulated stream
/// text for the log.
#[derive(Debug)]
pub struct RunOutcome {
    pub status: ExecStatus,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    /// Message of the terminal Failed event, when the run did not complete.
    pub failure: Option<String>,
    pub duration_ms: u64,
}

#[derive(Clone, Copy)]
enum StreamKind {
    Stdout,
    Stderr,
}

/// Run `command` in `workdir`, streaming events through `events`.
///
/// The command is split on whitespace into program + arguments; there is
/// no shell-quoting awareness. Environment variables are inherited from
/// the daemon process (PATH in particular). Exactly one terminal event is
/// emitted per invocation, after every chunk from both drained streams.
pub async fn run(
    command: &str,
    workdir: &Path,
    timeout: Duration,
    events: &mpsc::Sender<OutputEvent>,
) -> RunOutcome {
    let start = Instant::now();

    let mut parts = command.split_whitespace();
    let program = match parts.next() {
        Some(p) => p,
        // The policy gate rejects empty input before the runner sees it.
        None => return fail(events, start, "empty command".to_string()).await,
    };
    let args: Vec<&str> = parts.collect();

    let cmd_span = tracing::info_span!(
        "sandbox.exec",
        cmd = %program,
        exit_code = tracing::field::Empty,
        duration_ms = tracing::field::Empty,
    );

    let mut child = match Command::new(program)
        .args(&args)
        .current_dir(workdir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
    {
        Ok(child) => child,
        Err(source) => {
            let message = format!("failed to start `{program}`: {source}");
            return fail(events, start, message).await;
        }
    };

    let stdout_task =
        tokio::spawn(drain_stream(child.stdout.take(), StreamKind::Stdout, events.clone()));
    let stderr_task =
        tokio::spawn(drain_stream(child.stderr.take(), StreamKind::Stderr, events.clone()));

    // Race natural completion against the deadline. The losing side's
    // effect is discarded: a signal sent after exit is a no-op, and a
    // late exit status after the deadline is ignored.
    let waited = tokio::select! {
        status = child.wait() => Some(status),
        () = tokio::time::sleep(timeout) => None,
    };

    let (status, exit_code, failure) = match waited {
        Some(Ok(exit)) => {
            let code = exit.code().unwrap_or(-1);
            if code == 0 {
                (ExecStatus::Success, Some(code), None)
            } else {
                (ExecStatus::Failed, Some(code), None)
            }
        }
        Some(Err(source)) => {
            (ExecStatus::Error, None, Some(format!("failed to wait for process: {source}")))
        }
        None => {
            terminate(&mut child).await;
            let message = format!("command timed out after {timeout:?}");
            (ExecStatus::Error, None, Some(message))
        }
    };

    // Pipes reach EOF once the child is gone; joining here guarantees all
    // chunk events precede the terminal event.
    let stdout = stdout_task.await.unwrap_or_default();
    let stderr = stderr_task.await.unwrap_or_default();

    let duration = start.elapsed();
    let duration_ms = duration.as_millis() as u64;
    cmd_span.record("duration_ms", duration_ms);

    match failure {
        None => {
            let code = exit_code.unwrap_or(-1);
            cmd_span.record("exit_code", code);
            send_event(events, OutputEvent::Completed { exit_code: code, duration_ms }).await;
            RunOutcome { status, exit_code, stdout, stderr, failure: None, duration_ms }
        }
        Some(message) => {
            warn!(%message, "execution did not complete");
            send_event(events, OutputEvent::Failed { message: message.clone() }).await;
            RunOutcome { status, exit_code, stdout, stderr, failure: Some(message), duration_ms }
        }
    }
}

/// Drain one pipe to EOF, emitting a chunk event per read and returning
/// the accumulated text. Accumulation continues even if the receiver is
/// gone, so the log always sees the full stream.
async fn drain_stream<R>(
    stream: Option<R>,
    kind: StreamKind,
    events: mpsc::Sender<OutputEvent>,
) -> String
where
    R: AsyncRead + Unpin,
{
    let mut stream = match stream {
        Some(s) => s,
        None => return String::new(),
    };

    let mut accumulated = String::new();
    let mut buf = [0u8; READ_CHUNK];
    loop {
        match stream.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                let chunk = String::from_utf8_lossy(&buf[..n]).into_owned();
                accumulated.push_str(&chunk);
                let event = match kind {
                    StreamKind::Stdout => OutputEvent::Stdout { chunk },
                    StreamKind::Stderr => OutputEvent::Stderr { chunk },
                };
                let _ = events.send(event).await;
            }
            Err(e) => {
                debug!("pipe read ended: {e}");
                break;
            }
        }
    }
    accumulated
}

/// Kill a timed-out child: SIGTERM, a short grace, then SIGKILL, and reap.
async fn terminate(child: &mut Child) {
    if let Some(pid) = child.id() {
        let _ = signal::kill(Pid::from_raw(pid as i32), Signal::SIGTERM);
    }
    match tokio::time::timeout(KILL_GRACE, child.wait()).await {
        Ok(_) => {}
        Err(_) => {
            let _ = child.start_kill();
            let _ = child.wait().await;
        }
    }
}

/// Emit the terminal Failed event and build the error outcome for paths
/// where the process never produced a status.
async fn fail(
    events: &mpsc::Sender<OutputEvent>,
    start: Instant,
    message: String,
) -> RunOutcome {
    warn!(%message, "spawn failed");
    send_event(events, OutputEvent::Failed { message: message.clone() }).await;
    RunOutcome {
        status: ExecStatus::Error,
        exit_code: None,
        stdout: String::new(),
        stderr: String::new(),
        failure: Some(message),
        duration_ms: start.elapsed().as_millis() as u64,
    }
}

async fn send_event(events: &mpsc::Sender<OutputEvent>, event: OutputEvent) {
    // A closed receiver means the client went away; the outcome and the
    // log record do not depend on delivery.
    let _ = events.send(event).await;
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
