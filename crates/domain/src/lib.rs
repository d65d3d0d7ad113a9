//! # TrackSync Domain
//!
//! Business domain types and models for TrackSync.
//!
//! This crate contains:
//! - Source records and the transactions derived from them
//! - Per-record outcomes and the aggregate run report
//! - Domain error types and Result definitions
//! - Configuration structures
//!
//! ## Architecture
//! - No dependencies on other TrackSync crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
