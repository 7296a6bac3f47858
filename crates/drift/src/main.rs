//! Drift - emulation playback daemon
//!
//! Connects to a controller and plays the trace, motion and cell emulations
//! it sends.
//!
//! # Usage
//!
//! ```bash
//! drift
//! drift --config configs/drift.toml
//! drift --log-level debug --session-id device-1
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use drift_config::{Config, LogFormat};
use drift_control::{Scheduler, SessionId, channel_from_config};
use drift_session::{LogSink, PlaybackSettings, PlaybackState};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Time allowed for the active session to stop on shutdown
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Drift - emulation playback daemon
#[derive(Parser, Debug)]
#[command(name = "drift")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error), overrides the config
    #[arg(short, long)]
    log_level: Option<String>,

    /// Id announced to the controller (random if omitted)
    #[arg(long)]
    session_id: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_ref())?;
    let level = cli
        .log_level
        .as_deref()
        .unwrap_or(config.log.level.as_str());
    init_logging(level, config.log.format)?;

    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(default)".to_string());
    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_path,
        "drift starting"
    );

    if let Err(e) = run(config, cli.session_id).await {
        error!(error = %e, "drift error");
        return Err(e);
    }

    info!("drift shutdown complete");
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("config file not found: {}", path.display());
            }
            Config::from_file(path).context("failed to load configuration")
        }
        None => {
            let default = PathBuf::from("configs/drift.toml");
            if default.exists() {
                Config::from_file(&default).context("failed to load configuration")
            } else {
                Ok(Config::default())
            }
        }
    }
}

async fn run(config: Config, session_id: Option<String>) -> Result<()> {
    let id = session_id.map(SessionId::from).unwrap_or_default();
    let channel =
        channel_from_config(&config.control, id.clone()).context("failed to build channel")?;

    let settings = PlaybackSettings::from_config(&config.playback, config.control.package.clone());
    let state = Arc::new(PlaybackState::new());
    let scheduler = Scheduler::new(channel, settings, state, Arc::new(LogSink))
        .with_method(config.playback.method)
        .with_reconnect_interval(config.control.reconnect_interval);

    info!(
        session_id = %id,
        transport = ?config.control.transport,
        controller = %config.control.addr(),
        method = ?config.playback.method,
        "scheduler configured"
    );

    let cancel = CancellationToken::new();
    let mut task = tokio::spawn(scheduler.run(cancel.clone()));

    tokio::select! {
        _ = wait_for_shutdown() => {
            info!("shutdown signal received, stopping scheduler...");
        }
        result = &mut task => {
            result.context("scheduler task panicked")?;
            return Ok(());
        }
    }

    cancel.cancel();
    match tokio::time::timeout(SHUTDOWN_TIMEOUT, task).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "scheduler task panicked during shutdown"),
        Err(_) => warn!("scheduler did not stop within timeout"),
    }
    Ok(())
}

async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Initialize the tracing subscriber for logging
fn init_logging(level: &str, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Console => registry
            .with(fmt::layer().with_target(true).with_thread_ids(false))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init(),
    }

    Ok(())
}
