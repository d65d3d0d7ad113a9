//! # TrackSync Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (traits) for authentication, fetching and submission
//! - The record transformer (validation and defaulting)
//! - The synchronization orchestrator
//!
//! ## Architecture Principles
//! - Only depends on `tracksync-domain`
//! - No HTTP, file or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod sync;

// Re-export specific items to avoid ambiguity
pub use sync::orchestrator::SyncOrchestrator;
pub use sync::ports::{Authenticator, RecordFetcher, TransactionSubmitter};
pub use sync::transformer::RecordTransformer;
