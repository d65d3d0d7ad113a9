//! # TrackSync Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - HTTP client wrapper
//! - Source application adapters (password-grant authenticator, record fetcher)
//! - EAM adapter (SOAP envelope builder and transaction submitter)
//! - Configuration loading
//! - Logging setup
//!
//! ## Architecture
//! - Implements traits defined in `tracksync-core`
//! - Depends on `tracksync-domain` and `tracksync-core`
//! - Contains all "impure" code (network, files, environment)

pub mod config;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod observability;

// Re-export commonly used items
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use integrations::eam::{EamSubmitter, EnvelopeBuilder};
pub use integrations::source::{PasswordGrantAuthenticator, SourceRecordFetcher};
