//! Configuration loading and management
//!
//! This module loads the application configuration from a file (TOML, JSON
//! or legacy XML) and overlays environment variables.

pub mod loader;

// Re-export commonly used items
pub use loader::{load, load_from_file, probe_config_paths};
