//! `tracksync` - pushes shipment-tracking records from the source
//! application into the EAM as interface transactions.
//!
//! One invocation performs one synchronization run:
//! authenticate → fetch → transform → submit, then exits.
//!
//! Exit codes:
//! - `0` the run completed (individual records may still have failed)
//! - `1` configuration, authentication or fetch failure
//! - `2` the run completed with failed records and `--fail-on-errors` is set

// Errors raised before logging is initialized can only go to stderr.
#![allow(clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracksync_core::SyncOrchestrator;
use tracksync_domain::{Config, SyncReport};
use tracksync_infra::observability::init_logging;
use tracksync_infra::{config, EamSubmitter, PasswordGrantAuthenticator, SourceRecordFetcher};

const EXIT_RECORD_FAILURES: u8 = 2;

/// Synchronize shipment-tracking records into the EAM
#[derive(Debug, Parser)]
#[command(name = "tracksync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (.xml, .toml or .json); probed when omitted
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log file, overriding `logging.file` and `TRACKSYNC_LOG_FILE`
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Exit with status 2 when any record failed to submit
    #[arg(long)]
    fail_on_errors: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("tracksync: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    // A missing .env is the normal case outside development.
    let _ = dotenvy::dotenv();

    let mut config = config::load(cli.config).context("failed to load configuration")?;
    if let Some(path) = cli.log_file {
        config.logging.file = path.display().to_string();
    }

    let _log_guard = init_logging(&config.logging).context("failed to initialize logging")?;
    info!(version = env!("CARGO_PKG_VERSION"), "tracksync starting");

    let orchestrator = build_orchestrator(&config)?;
    let report = match orchestrator.run(&config.credentials).await {
        Ok(report) => report,
        Err(err) => {
            error!(error = %err, "synchronization aborted");
            return Err(err).context("synchronization aborted");
        }
    };

    Ok(ExitCode::from(exit_status(&report, cli.fail_on_errors)))
}

fn build_orchestrator(config: &Config) -> anyhow::Result<SyncOrchestrator> {
    let authenticator =
        PasswordGrantAuthenticator::new(config.source.auth_timeout_secs.map(Duration::from_secs))
            .context("failed to build authentication client")?;
    let fetcher = SourceRecordFetcher::new(
        config.source.app_url.clone(),
        config.source.fetch_timeout_secs.map(Duration::from_secs),
    )
    .context("failed to build source client")?;
    let submitter = EamSubmitter::new(&config.eam).context("failed to build EAM client")?;

    Ok(SyncOrchestrator::new(Arc::new(authenticator), Arc::new(fetcher), Arc::new(submitter))
        .with_options(config.sync.clone()))
}

fn exit_status(report: &SyncReport, fail_on_errors: bool) -> u8 {
    if fail_on_errors && report.failed() > 0 {
        EXIT_RECORD_FAILURES
    } else {
        0
    }
}
