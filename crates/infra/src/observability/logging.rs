//! Logging setup: stdout plus an append-only log file.

use std::path::Path;

use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use tracksync_domain::{LoggingConfig, Result, TrackSyncError};

use crate::errors::InfraError;

/// Install the global subscriber.
///
/// The filter comes from `RUST_LOG` when set, else from `config.level`.
///
/// # Errors
/// `TrackSyncError::Config` when the log file location or the level is
/// unusable; `Internal` when a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let (subscriber, guard) = build_subscriber(config)?;
    subscriber
        .try_init()
        .map_err(|e| TrackSyncError::Internal(format!("logging already initialized: {e}")))?;
    Ok(guard)
}

fn build_subscriber(
    config: &LoggingConfig,
) -> Result<(impl Subscriber + Send + Sync + 'static, WorkerGuard)> {
    let filter = env_filter(&config.level)?;

    let path = Path::new(&config.file);
    let file_name = path.file_name().ok_or_else(|| {
        TrackSyncError::Config(format!("logging.file is not a file path: {}", config.file))
    })?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| TrackSyncError::from(InfraError::from(e)))?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(
        dir, file_name,
    ));

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(fmt::layer().with_writer(writer).with_ansi(false).with_target(false));

    Ok((subscriber, guard))
}

fn env_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level)
        .map_err(|e| TrackSyncError::Config(format!("invalid logging.level `{level}`: {e}")))
}
