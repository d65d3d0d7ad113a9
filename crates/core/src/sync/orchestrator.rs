//! Synchronization orchestrator
//!
//! Sequences one run: authenticate once, fetch once, then transform and
//! submit every record in fetch order. Authentication and fetch failures
//! abort the run; per-record failures are recorded and the loop continues.
//!
//! With `submit_concurrency > 1` submissions overlap through an
//! order-preserving buffered stream, so report lines and outcomes still
//! follow fetch order.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use tracing::{error, info, warn, Instrument};
use tracksync_domain::{
    Credentials, RecordOutcome, Result, Scalar, SourceRecord, SyncOptions, SyncReport, SyncResult,
    Transaction,
};
use uuid::Uuid;

use super::ports::{Authenticator, RecordFetcher, TransactionSubmitter};
use super::transformer::RecordTransformer;

/// Runs the authenticate → fetch → transform → submit pipeline.
pub struct SyncOrchestrator {
    authenticator: Arc<dyn Authenticator>,
    fetcher: Arc<dyn RecordFetcher>,
    submitter: Arc<dyn TransactionSubmitter>,
    transformer: RecordTransformer,
    options: SyncOptions,
}

impl SyncOrchestrator {
    /// Create an orchestrator with sequential submission.
    pub fn new(
        authenticator: Arc<dyn Authenticator>,
        fetcher: Arc<dyn RecordFetcher>,
        submitter: Arc<dyn TransactionSubmitter>,
    ) -> Self {
        Self {
            authenticator,
            fetcher,
            submitter,
            transformer: RecordTransformer::new(),
            options: SyncOptions::default(),
        }
    }

    /// Override orchestrator tuning (submission concurrency).
    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    /// Execute one synchronization run.
    ///
    /// # Errors
    /// Propagates `Auth` and `Fetch` errors; no partial report is produced in
    /// that case.
    pub async fn run(&self, credentials: &Credentials) -> Result<SyncReport> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("sync_run", %run_id);
        self.run_inner(run_id, credentials).instrument(span).await
    }

    async fn run_inner(&self, run_id: Uuid, credentials: &Credentials) -> Result<SyncReport> {
        let started = Instant::now();
        let mut report = SyncReport::new(run_id, Utc::now());

        let token = self.authenticator.authenticate(credentials).await.inspect_err(|err| {
            error!(error = %err, "authentication failed; aborting run");
        })?;

        let records = self.fetcher.fetch(&token).await.inspect_err(|err| {
            error!(error = %err, "fetching source records failed; aborting run");
        })?;

        let total = records.len();
        let concurrency = self.options.submit_concurrency.max(1);

        let outcomes: Vec<RecordOutcome> = stream::iter(records.iter().enumerate())
            .map(|(index, record)| self.process_record(index + 1, total, record))
            .buffered(concurrency)
            .collect()
            .await;

        for outcome in outcomes {
            report.record(outcome);
        }
        report.finish(u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX));

        info!(
            total = report.total(),
            sent = report.sent(),
            failed = report.failed(),
            skipped = report.skipped(),
            duration_ms = report.duration_ms(),
            "{}",
            report.summary()
        );

        Ok(report)
    }

    async fn process_record(
        &self,
        position: usize,
        total: usize,
        record: &SourceRecord,
    ) -> RecordOutcome {
        let transaction = match self.transformer.transform(record) {
            Ok(transaction) => transaction,
            Err(skip) => {
                let line = format!(
                    "[{position}/{total}] skipped record (request={}, item={}): {skip}",
                    display_field(record.request_number.as_ref()),
                    display_field(record.item_code.as_ref()),
                );
                warn!(position, reason = %skip, "{line}");
                return RecordOutcome {
                    position,
                    result: SyncResult::Skipped { reason: skip.to_string() },
                    line,
                };
            }
        };

        info!(
            position,
            "[{position}/{total}] submitting request={} item={} qty={} unit={} completed={}",
            transaction.request_number,
            transaction.item_code,
            transaction.item_quantity,
            transaction.delivery_unit_name,
            transaction.completion_date,
        );

        let result = self.submitter.submit(&transaction).await;
        let line = outcome_line(position, total, &transaction, &result);
        if result.is_sent() {
            info!(position, "{line}");
        } else {
            warn!(position, "{line}");
        }

        RecordOutcome { position, result, line }
    }
}

fn display_field(value: Option<&Scalar>) -> String {
    value.map_or_else(|| "-".to_string(), ToString::to_string)
}

fn outcome_line(
    position: usize,
    total: usize,
    transaction: &Transaction,
    result: &SyncResult,
) -> String {
    let request = &transaction.request_number;
    match result {
        SyncResult::Sent { transaction_id: Some(id) } => {
            format!("[{position}/{total}] sent request={request}: TRANSID {id} created")
        }
        SyncResult::Sent { transaction_id: None } => {
            format!("[{position}/{total}] sent request={request}: TRANSID created")
        }
        SyncResult::HttpError { status: 200 } => {
            format!("[{position}/{total}] failed request={request}: HTTP 200 without TRANSID")
        }
        SyncResult::HttpError { status } => {
            format!("[{position}/{total}] failed request={request}: HTTP {status}")
        }
        SyncResult::TransportError { description } => {
            format!("[{position}/{total}] failed request={request}: transport error: {description}")
        }
        SyncResult::Skipped { reason } => {
            format!("[{position}/{total}] skipped request={request}: {reason}")
        }
    }
}
