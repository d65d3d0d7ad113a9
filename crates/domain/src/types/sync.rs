//! Credentials, per-record outcomes and the aggregate run report.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Password-grant credentials for the source application's identity server.
///
/// The [`Debug`] impl redacts secrets so the value can be traced safely.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Token endpoint of the authorization server.
    pub auth_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("auth_url", &self.auth_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Opaque bearer token valid for one synchronization run.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

/// Outcome of processing a single source record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SyncResult {
    /// HTTP 200 with a `<TRANSID` marker: the EAM created the transaction.
    Sent { transaction_id: Option<String> },
    /// The call completed but did not create a transaction.
    HttpError { status: u16 },
    /// The call never produced a response (connect, DNS, timeout, body read).
    TransportError { description: String },
    /// The record failed validation and was not submitted.
    Skipped { reason: String },
}

impl SyncResult {
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }

    /// HTTP and transport errors both count as failures.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::HttpError { .. } | Self::TransportError { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

/// One entry of the report: a record's position in the batch, its outcome and
/// the human-readable line emitted for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordOutcome {
    /// 1-based position in fetch order.
    pub position: usize,
    pub result: SyncResult,
    pub line: String,
}

/// Aggregate result of one synchronization run.
///
/// Counters are only advanced through [`SyncReport::record`], so
/// `sent + failed + skipped == total` holds at all times.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    run_id: Uuid,
    started_at: DateTime<Utc>,
    duration_ms: u64,
    sent: usize,
    failed: usize,
    skipped: usize,
    outcomes: Vec<RecordOutcome>,
}

impl SyncReport {
    pub fn new(run_id: Uuid, started_at: DateTime<Utc>) -> Self {
        Self {
            run_id,
            started_at,
            duration_ms: 0,
            sent: 0,
            failed: 0,
            skipped: 0,
            outcomes: Vec::new(),
        }
    }

    /// Append the next outcome in processing order.
    pub fn record(&mut self, outcome: RecordOutcome) {
        match &outcome.result {
            SyncResult::Sent { .. } => self.sent += 1,
            SyncResult::HttpError { .. } | SyncResult::TransportError { .. } => self.failed += 1,
            SyncResult::Skipped { .. } => self.skipped += 1,
        }
        self.outcomes.push(outcome);
    }

    pub fn finish(&mut self, duration_ms: u64) {
        self.duration_ms = duration_ms;
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn sent(&self) -> usize {
        self.sent
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn outcomes(&self) -> &[RecordOutcome] {
        &self.outcomes
    }

    /// Per-record log lines in processing order.
    pub fn lines(&self) -> Vec<&str> {
        self.outcomes.iter().map(|outcome| outcome.line.as_str()).collect()
    }

    /// One-line summary suitable for the terminal log entry.
    pub fn summary(&self) -> String {
        format!(
            "synchronization finished: {} records, {} sent, {} failed, {} skipped",
            self.total(),
            self.sent,
            self.failed,
            self.skipped
        )
    }
}
