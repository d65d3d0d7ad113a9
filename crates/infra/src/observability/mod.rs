//! Observability infrastructure
//!
//! Structured logging through `tracing`: one human-readable layer on stdout
//! and one append-only log file written by a non-blocking background worker.
//! The returned [`WorkerGuard`](tracing_appender::non_blocking::WorkerGuard)
//! must be held until the process exits so buffered lines are flushed.

pub mod logging;

pub use logging::init_logging;
