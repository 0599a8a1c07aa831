//! yamirror Daemon - Background one-way mirroring service
//!
//! This binary runs as a long-lived process and handles:
//! - Periodic reconciliation of a local directory into a Disk folder
//! - Startup validation of configuration and remote reachability
//! - Graceful shutdown on SIGTERM/SIGINT
//!
//! # Architecture
//!
//! The daemon reads its configuration from the environment, probes the
//! remote folder once so a bad token or folder path fails fast, then hands
//! control to the [`Scheduler`] loop. The loop is controlled by a
//! `CancellationToken` that is triggered on receipt of SIGTERM or SIGINT.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

use yamirror_core::config::{Config, ENV_REMOTE_DIR, ENV_TOKEN};
use yamirror_core::ports::remote_storage::{RemoteError, RemoteStorage};
use yamirror_disk::{DiskClient, DiskStorage};
use yamirror_sync::scheduler::Scheduler;

// ============================================================================
// CLI
// ============================================================================

/// One-way mirror of a local directory into a Yandex Disk folder
#[derive(Debug, Parser)]
#[command(name = "yamirrord", version, about)]
struct Cli {
    /// Run a single reconciliation pass and exit
    #[arg(long)]
    once: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log to stdout only, skipping the configured log file
    #[arg(long)]
    no_log_file: bool,
}

// ============================================================================
// Tracing setup
// ============================================================================

/// Install the global tracing subscriber.
///
/// Log lines go to the configured log file (append mode, parent directory
/// created on demand) and to stdout; `RUST_LOG` overrides the verbosity
/// flag when set.
fn init_tracing(config: &Config, cli: &Cli) -> Result<()> {
    let fallback = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    if cli.no_log_file {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
        return Ok(());
    }

    if let Some(parent) = config.log_file.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create log directory {}", parent.display())
            })?;
        }
    }

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("Failed to open log file {}", config.log_file.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_ansi(false)
        .with_writer(log_file.and(std::io::stdout))
        .init();

    Ok(())
}

// ============================================================================
// Startup validation
// ============================================================================

/// Probe the remote folder once before entering the loop.
///
/// A rejected token or missing folder is a configuration problem and must
/// stop the daemon with a clear hint. A connection failure is not: the
/// loop tolerates an unreachable remote and converges once it is back.
async fn validate_remote(storage: &dyn RemoteStorage, folder: &str) -> Result<()> {
    match storage.list().await {
        Ok(_) => {
            info!(folder, "Remote folder reachable");
            Ok(())
        }
        Err(RemoteError::Unauthorized) => {
            anyhow::bail!("Remote storage rejected the access token. Check '{ENV_TOKEN}'.")
        }
        Err(err @ RemoteError::FolderNotFound { .. }) => {
            anyhow::bail!("{err}. Check '{ENV_REMOTE_DIR}'.")
        }
        Err(RemoteError::Transport(err)) => {
            warn!(error = %err, "Remote storage unreachable at startup, continuing");
            Ok(())
        }
    }
}

// ============================================================================
// Graceful shutdown signal handler
// ============================================================================

/// Waits for SIGTERM or SIGINT and triggers the cancellation token.
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C)");
        }
        _ = terminate => {
            info!("Received SIGTERM");
        }
    }

    token.cancel();
}

// ============================================================================
// Main entry point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Configuration problems are reported before the loop ever starts.
    let config = Config::from_env().context("Invalid configuration")?;
    let validation_errors = config.validate();
    if !validation_errors.is_empty() {
        for err in &validation_errors {
            eprintln!("configuration error: {err}");
        }
        anyhow::bail!("Invalid configuration ({} error(s))", validation_errors.len());
    }

    init_tracing(&config, &cli)?;

    info!(
        local_dir = %config.local_dir.display(),
        remote_dir = %config.remote_dir,
        poll_interval_secs = config.poll_interval,
        "yamirror daemon starting (yamirrord)"
    );

    let client = DiskClient::new(&config.token, &config.remote_dir);
    let storage: Arc<dyn RemoteStorage> = Arc::new(DiskStorage::new(client));

    validate_remote(storage.as_ref(), &config.remote_dir).await?;

    let shutdown_token = CancellationToken::new();
    let mut scheduler = Scheduler::new(
        storage,
        config.local_dir.clone(),
        Duration::from_secs(config.poll_interval),
        shutdown_token.clone(),
    );

    if cli.once {
        scheduler.tick().await;
        info!("Single pass finished, exiting");
        return Ok(());
    }

    // Spawn signal handler task
    let signal_token = shutdown_token.clone();
    tokio::spawn(async move {
        shutdown_signal(signal_token).await;
    });

    scheduler.run().await;

    info!("yamirror daemon shut down gracefully");
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
