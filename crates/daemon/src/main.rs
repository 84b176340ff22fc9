// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! runboxd — the Runbox daemon binary.

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use runbox_daemon::lifecycle::{self, Config, StartupResult};
use runbox_daemon::listener::{ListenCtx, Listener};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        error!("daemon failed: {e}");
        eprintln!("runboxd: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), lifecycle::LifecycleError> {
    let config = Config::load()?;
    let StartupResult { daemon, listener, shutdown } = lifecycle::startup(&config)?;

    let ctx = Arc::new(ListenCtx {
        coordinator: Arc::clone(&daemon.coordinator),
        start_time: daemon.start_time,
        shutdown: Arc::clone(&shutdown),
    });
    tokio::spawn(Listener::new(listener, ctx).run());

    info!(socket = %config.socket_path.display(), sandbox = %config.sandbox_path.display(), "listening");
    // Startup marker for callers that spawn the daemon and wait for it.
    println!("READY");

    tokio::select! {
        () = shutdown.notified() => info!("shutdown requested"),
        () = shutdown_signal() => info!("termination signal received"),
    }

    daemon.shutdown();
    Ok(())
}

/// Resolves when SIGTERM or SIGINT arrives.
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
        (Ok(mut term), Ok(mut int)) => {
            tokio::select! {
                _ = term.recv() => {}
                _ = int.recv() => {}
            }
        }
        _ => {
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}
