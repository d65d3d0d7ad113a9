//! Port interfaces for sync operations

use async_trait::async_trait;
use tracksync_domain::{AccessToken, Credentials, Result, SourceRecord, SyncResult, Transaction};

/// Exchanges credentials for a bearer token.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Obtain a token for this run.
    ///
    /// # Errors
    /// `TrackSyncError::Auth` on a non-2xx answer, a body without
    /// `access_token`, or a transport failure.
    async fn authenticate(&self, credentials: &Credentials) -> Result<AccessToken>;
}

/// Retrieves the batch of source records.
#[async_trait]
pub trait RecordFetcher: Send + Sync {
    /// Fetch every record in one call, preserving the source order.
    ///
    /// # Errors
    /// `TrackSyncError::Fetch` on a non-2xx answer, a transport failure or a
    /// body that does not match the expected shape.
    async fn fetch(&self, token: &AccessToken) -> Result<Vec<SourceRecord>>;
}

/// Delivers one transaction to the target system.
///
/// Infallible by signature: every failure is classified into the returned
/// [`SyncResult`] so one record can never abort the batch.
#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
    async fn submit(&self, transaction: &Transaction) -> SyncResult;
}
