//! Configuration structures
//!
//! Plain data loaded once at startup and passed by reference into the
//! adapters and the orchestrator. Loading and validation live in
//! `tracksync-infra::config`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_LOG_FILE, DEFAULT_LOG_LEVEL, DEFAULT_ORIGIN_MARKER, DEFAULT_SUBMIT_CONCURRENCY,
    DEFAULT_SUBMIT_TIMEOUT_SECS,
};
use crate::types::Credentials;

/// Complete, validated application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub credentials: Credentials,
    pub source: SourceConfig,
    pub eam: EamConfig,
    #[serde(default)]
    pub sync: SyncOptions,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Source application endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Endpoint returning `{ "results": { "data": [...] } }`.
    pub app_url: String,
    /// Timeout for the token request. `None` leaves it to the transport.
    #[serde(default)]
    pub auth_timeout_secs: Option<u64>,
    /// Timeout for the batch fetch. `None` leaves it to the transport.
    #[serde(default)]
    pub fetch_timeout_secs: Option<u64>,
}

/// EAM web-service endpoint and security context.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EamConfig {
    pub url: String,
    pub user: String,
    pub password: String,
    pub tenant: String,
    pub organization: String,
    /// Value written to the `CHANGED` field of every transaction.
    #[serde(default = "default_origin_marker")]
    pub origin_marker: String,
    #[serde(default = "default_submit_timeout_secs")]
    pub timeout_secs: u64,
}

impl EamConfig {
    /// `user@tenant`, as expected by the `UsernameToken` header.
    pub fn qualified_user(&self) -> String {
        format!("{}@{}", self.user, self.tenant)
    }
}

impl fmt::Debug for EamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EamConfig")
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("tenant", &self.tenant)
            .field("organization", &self.organization)
            .field("origin_marker", &self.origin_marker)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Orchestrator tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOptions {
    /// Maximum submissions in flight. `1` means strictly sequential.
    #[serde(default = "default_submit_concurrency")]
    pub submit_concurrency: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self { submit_concurrency: DEFAULT_SUBMIT_CONCURRENCY }
    }
}

/// Log sink settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Append-only log file mirrored from the console output.
    #[serde(default = "default_log_file")]
    pub file: String,
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { file: default_log_file(), level: default_log_level() }
    }
}

fn default_origin_marker() -> String {
    DEFAULT_ORIGIN_MARKER.to_string()
}

fn default_submit_timeout_secs() -> u64 {
    DEFAULT_SUBMIT_TIMEOUT_SECS
}

fn default_submit_concurrency() -> usize {
    DEFAULT_SUBMIT_CONCURRENCY
}

fn default_log_file() -> String {
    DEFAULT_LOG_FILE.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
