// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client connection to the daemon socket.

use std::path::PathBuf;

use thiserror::Error;
use tokio::net::UnixStream;

use runbox_core::{LogRecord, OutputEvent};
use runbox_daemon::lifecycle::{Config, LifecycleError};
use runbox_wire::{decode, encode, read_message, write_message, ProtocolError, Request, Response};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("daemon not running (no socket at {0})")]
    NotRunning(PathBuf),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("unexpected response: {0:?}")]
    Unexpected(Response),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

/// How an execution request ended, from the client's point of view.
#[derive(Debug)]
pub enum ExecVerdict {
    Rejected(String),
    Busy,
    Completed { exit_code: i32, duration_ms: u64 },
    Failed(String),
}

pub struct DaemonClient {
    socket_path: PathBuf,
}

impl DaemonClient {
    /// Resolve the socket path from the daemon configuration.
    pub fn from_env() -> Result<Self, ClientError> {
        let config = Config::load()?;
        Ok(Self { socket_path: config.socket_path })
    }

    async fn connect(&self) -> Result<UnixStream, ClientError> {
        UnixStream::connect(&self.socket_path)
            .await
            .map_err(|_| ClientError::NotRunning(self.socket_path.clone()))
    }

    /// One-shot request/response exchange.
    pub async fn send(&self, request: &Request) -> Result<Response, ClientError> {
        let mut stream = self.connect().await?;
        let data = encode(request)?;
        write_message(&mut stream, &data).await?;
        let data = read_message(&mut stream).await?;
        Ok(decode(&data)?)
    }

    pub async fn ping(&self) -> Result<(), ClientError> {
        match self.send(&Request::Ping).await? {
            Response::Pong => Ok(()),
            other => Err(ClientError::Unexpected(other)),
        }
    }

    pub async fn status(&self) -> Result<(bool, u64, String), ClientError> {
        match self.send(&Request::Status).await? {
            Response::Status { executing, uptime_secs, timestamp, .. } => {
                Ok((executing, uptime_secs, timestamp))
            }
            other => Err(ClientError::Unexpected(other)),
        }
    }

    pub async fn history(&self) -> Result<Vec<LogRecord>, ClientError> {
        match self.send(&Request::History).await? {
            Response::History { records } => Ok(records),
            other => Err(ClientError::Unexpected(other)),
        }
    }

    pub async fn generate(&self, prompt: &str) -> Result<Response, ClientError> {
        self.send(&Request::Generate { prompt: prompt.to_string() }).await
    }

    /// Request daemon shutdown. Returns false when no daemon is running.
    pub async fn shutdown(&self) -> Result<bool, ClientError> {
        match self.send(&Request::Shutdown).await {
            Ok(Response::ShuttingDown) => Ok(true),
            Ok(other) => Err(ClientError::Unexpected(other)),
            Err(ClientError::NotRunning(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Submit a command for execution, invoking `on_event` for every
    /// streamed event until the terminal one.
    pub async fn execute(
        &self,
        command: &str,
        mut on_event: impl FnMut(&OutputEvent),
    ) -> Result<ExecVerdict, ClientError> {
        let mut stream = self.connect().await?;
        let request = Request::Execute { command: command.to_string() };
        write_message(&mut stream, &encode(&request)?).await?;

        match decode(&read_message(&mut stream).await?)? {
            Response::Accepted => {}
            Response::Rejected { reason } => return Ok(ExecVerdict::Rejected(reason)),
            Response::Busy => return Ok(ExecVerdict::Busy),
            other => return Err(ClientError::Unexpected(other)),
        }

        loop {
            let event = match decode(&read_message(&mut stream).await?)? {
                Response::Event { event } => event,
                other => return Err(ClientError::Unexpected(other)),
            };
            on_event(&event);
            match event {
                OutputEvent::Completed { exit_code, duration_ms } => {
                    return Ok(ExecVerdict::Completed { exit_code, duration_ms });
                }
                OutputEvent::Failed { message } => return Ok(ExecVerdict::Failed(message)),
                OutputEvent::Stdout { .. } | OutputEvent::Stderr { .. } => {}
            }
        }
    }
}
