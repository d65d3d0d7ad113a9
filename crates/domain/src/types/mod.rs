//! Domain types and models

pub mod record;
pub mod sync;
pub mod transaction;

pub use record::{Scalar, SourceRecord};
pub use sync::{AccessToken, Credentials, RecordOutcome, SyncReport, SyncResult};
pub use transaction::{Transaction, ValidationSkip};
