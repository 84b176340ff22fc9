// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listener task for handling socket I/O.
//!
//! The Listener runs in a spawned task, accepting connections and handling
//! each in its own task without blocking the rest of the daemon. Most
//! requests are strict request/response; Execute upgrades the connection
//! into a one-way event stream until the terminal event.

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::UnixListener;
use tokio::sync::{mpsc, Notify};
use tracing::{debug, error, info, warn};

use runbox_core::{Clock, SystemClock};
use runbox_wire::{self as wire, ProtocolError, Request, Response};

use crate::coordinator::{DaemonCoordinator, SubmitError};
use crate::env;
use crate::generate;

/// Shared daemon context for all request handlers.
pub struct ListenCtx {
    pub coordinator: Arc<DaemonCoordinator>,
    pub start_time: Instant,
    pub shutdown: Arc<Notify>,
}

/// Listener task for accepting socket connections.
pub struct Listener {
    unix: UnixListener,
    ctx: Arc<ListenCtx>,
}

/// Errors from connection handling.
#[derive(Debug, Error)]
pub(crate) enum ConnectionError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl Listener {
    pub fn new(unix: UnixListener, ctx: Arc<ListenCtx>) -> Self {
        Self { unix, ctx }
    }

    /// Run the listener loop until the runtime exits, spawning a task per
    /// connection.
    pub async fn run(self) {
        loop {
            match self.unix.accept().await {
                Ok((stream, _)) => {
                    let ctx = Arc::clone(&self.ctx);
                    tokio::spawn(async move {
                        let (reader, writer) = stream.into_split();
                        if let Err(e) = handle_connection(reader, writer, &ctx).await {
                            log_connection_error(e);
                        }
                    });
                }
                Err(e) => error!("Unix accept error: {}", e),
            }
        }
    }
}

fn log_connection_error(e: ConnectionError) {
    match e {
        ConnectionError::Protocol(ProtocolError::ConnectionClosed) => {
            debug!("Client disconnected")
        }
        ConnectionError::Protocol(ProtocolError::Timeout) => {
            warn!("Connection timeout")
        }
        _ => error!("Connection error: {}", e),
    }
}

/// Handle a single client connection.
///
/// Generic over reader/writer types so unit tests can drive it over
/// in-memory pipes.
pub(crate) async fn handle_connection<R, W>(
    mut reader: R,
    mut writer: W,
    ctx: &ListenCtx,
) -> Result<(), ConnectionError>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    // Read request with timeout
    let request = wire::read_request(&mut reader, env::ipc_timeout()).await?;

    // Log probes at debug level (frequent polling), other requests at info
    if matches!(request, Request::Ping | Request::Status | Request::History) {
        debug!(request = ?request, "received query");
    } else {
        info!(request = ?request, "received request");
    }

    // Execute is a connection-upgrading request — after admission, the
    // connection carries the event stream. Handle it before the normal
    // request/response dispatch.
    if let Request::Execute { ref command } = request {
        return handle_execute(command, writer, ctx).await;
    }

    let response = handle_request(request, ctx);

    debug!("Sending response: {:?}", response);
    wire::write_response(&mut writer, &response, env::ipc_timeout()).await?;

    Ok(())
}

/// Handle a strict request/response request.
fn handle_request(request: Request, ctx: &ListenCtx) -> Response {
    match request {
        Request::Ping => Response::Pong,

        Request::Hello { version: _ } => {
            Response::Hello { version: env::PROTOCOL_VERSION.to_string() }
        }

        Request::Generate { prompt } => match generate::generate(&prompt) {
            Ok(generated) => Response::Generated {
                command: generated.command,
                prompt,
                note: generated.note.to_string(),
            },
            Err(e) => Response::Error { message: e.to_string() },
        },

        Request::History => Response::History { records: ctx.coordinator.history().load() },

        Request::Status => Response::Status {
            ok: true,
            executing: ctx.coordinator.is_executing(),
            uptime_secs: ctx.start_time.elapsed().as_secs(),
            timestamp: SystemClock.now_utc().to_rfc3339(),
        },

        Request::Shutdown => {
            ctx.shutdown.notify_one();
            Response::ShuttingDown
        }

        // Execute is dispatched before this point.
        Request::Execute { .. } => Response::Error { message: "unreachable".to_string() },
    }
}

/// Handle Execute: admit, stream, finalize.
///
/// The admission verdict is a single frame. On admission the coordinator
/// drives the runner in a separate task while this task relays events to
/// the client; a broken client keeps the relay draining so the execution
/// always finishes and gets logged.
async fn handle_execute<W>(
    command: &str,
    mut writer: W,
    ctx: &ListenCtx,
) -> Result<(), ConnectionError>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    let execution = match ctx.coordinator.begin(command) {
        Ok(execution) => execution,
        Err(SubmitError::Rejected(reason)) => {
            info!(%command, %reason, "command rejected");
            let response = Response::Rejected { reason: reason.to_string() };
            wire::write_response(&mut writer, &response, env::ipc_timeout()).await?;
            return Ok(());
        }
        Err(SubmitError::Busy) => {
            debug!(%command, "busy, rejecting");
            wire::write_response(&mut writer, &Response::Busy, env::ipc_timeout()).await?;
            return Ok(());
        }
    };

    wire::write_response(&mut writer, &Response::Accepted, env::ipc_timeout()).await?;

    let (events_tx, mut events_rx) = mpsc::channel(64);
    let coordinator = Arc::clone(&ctx.coordinator);
    let driver = tokio::spawn(async move { coordinator.run(execution, events_tx).await });

    let mut sink_broken = false;
    while let Some(event) = events_rx.recv().await {
        if sink_broken {
            continue;
        }
        let frame = Response::Event { event };
        if let Err(e) = wire::write_response(&mut writer, &frame, env::ipc_timeout()).await {
            debug!("client sink failed mid-stream: {e}");
            sink_broken = true;
        }
    }

    // The driver finalizes (log append, slot release) regardless of the sink.
    let _ = driver.await;
    Ok(())
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;
