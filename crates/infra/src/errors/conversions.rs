//! Conversions from external infrastructure errors into domain errors.

use std::error::Error as StdError;
use std::io::Error as IoError;

use reqwest::Error as HttpError;
use tracksync_domain::TrackSyncError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub TrackSyncError);

impl From<InfraError> for TrackSyncError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<TrackSyncError> for InfraError {
    fn from(value: TrackSyncError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoTrackSyncError {
    fn into_tracksync(self) -> TrackSyncError;
}

/// Innermost cause of an error chain; reqwest wraps the interesting part
/// (DNS failure, refused connection) several layers deep.
fn root_cause(err: &(dyn StdError + 'static)) -> String {
    let mut current = err;
    while let Some(source) = current.source() {
        current = source;
    }
    current.to_string()
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → TrackSyncError */
/* -------------------------------------------------------------------------- */

impl IntoTrackSyncError for HttpError {
    fn into_tracksync(self) -> TrackSyncError {
        if self.is_timeout() {
            return TrackSyncError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return TrackSyncError::Network(format!(
                "HTTP connection failure: {}",
                root_cause(&self)
            ));
        }

        if self.is_builder() {
            return TrackSyncError::InvalidInput(format!("invalid HTTP request: {self}"));
        }

        if self.is_decode() || self.is_body() {
            return TrackSyncError::Network(format!(
                "HTTP response body could not be read: {}",
                root_cause(&self)
            ));
        }

        TrackSyncError::Network(format!("HTTP request failed: {}", root_cause(&self)))
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_tracksync())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → TrackSyncError */
/* -------------------------------------------------------------------------- */

impl IntoTrackSyncError for IoError {
    fn into_tracksync(self) -> TrackSyncError {
        TrackSyncError::Config(format!("I/O failure: {self}"))
    }
}

impl From<IoError> for InfraError {
    fn from(value: IoError) -> Self {
        InfraError(value.into_tracksync())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
