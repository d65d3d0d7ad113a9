//! Configuration loader
//!
//! Loads the application configuration from a file and overlays environment
//! variables on top of it.
//!
//! ## Loading Strategy
//! 1. Use the explicit path when given, otherwise probe the standard paths
//! 2. Parse by extension: TOML, JSON or the legacy flat XML document
//! 3. Overlay environment variables (EAM section, log file, concurrency)
//! 4. Validate the merged result
//!
//! ## Environment Variables
//! - `EAM_URL`: EAM web-service endpoint
//! - `EAM_USER`: EAM user (sent as `user@tenant`)
//! - `EAM_PASS`: EAM password
//! - `EAM_TENANT`: EAM tenant
//! - `EAM_ORG`: EAM organization
//! - `TRACKSYNC_LOG_FILE`: Log file path
//! - `TRACKSYNC_SUBMIT_CONCURRENCY`: Maximum submissions in flight
//!
//! ## File Locations
//! The loader probes the following names (in order), first in the current
//! working directory and then next to the executable:
//! `config.xml`, `config.toml`, `config.json`, `tracksync.toml`,
//! `tracksync.json`.
//!
//! ## Legacy XML
//! ```xml
//! <multpex_config>
//!   <SERVIDOR_AUTENTICACAO>https://auth/token</SERVIDOR_AUTENTICACAO>
//!   <SERVIDOR_APLICACAO>https://app/tracking</SERVIDOR_APLICACAO>
//!   <CLIENT_ID>..</CLIENT_ID>
//!   <CLIENT_SECRET>..</CLIENT_SECRET>
//!   <USERNAME>..</USERNAME>
//!   <PASSWORD>..</PASSWORD>
//! </multpex_config>
//! ```
//! It carries no EAM section; that part must come from the environment.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracksync_domain::constants::{DEFAULT_ORIGIN_MARKER, DEFAULT_SUBMIT_TIMEOUT_SECS};
use tracksync_domain::{
    Config, Credentials, EamConfig, LoggingConfig, Result, SourceConfig, SyncOptions,
    TrackSyncError,
};
use url::Url;

use crate::errors::InfraError;

const CONFIG_FILE_NAMES: [&str; 5] =
    ["config.xml", "config.toml", "config.json", "tracksync.toml", "tracksync.json"];

/// Configuration as written in a TOML/JSON file. The EAM section is optional
/// because deployments usually provide it through the environment.
#[derive(Debug, Deserialize)]
struct FileConfig {
    credentials: Credentials,
    source: SourceConfig,
    #[serde(default)]
    eam: Option<FileEamConfig>,
    #[serde(default)]
    sync: SyncOptions,
    #[serde(default)]
    logging: LoggingConfig,
}

#[derive(Debug, Default, Deserialize)]
struct FileEamConfig {
    url: Option<String>,
    user: Option<String>,
    password: Option<String>,
    tenant: Option<String>,
    organization: Option<String>,
    origin_marker: Option<String>,
    timeout_secs: Option<u64>,
}

/// Flat `<multpex_config>` document.
#[derive(Debug, Deserialize)]
struct LegacyXmlConfig {
    #[serde(rename = "SERVIDOR_AUTENTICACAO")]
    auth_url: String,
    #[serde(rename = "SERVIDOR_APLICACAO")]
    app_url: String,
    #[serde(rename = "CLIENT_ID")]
    client_id: String,
    #[serde(rename = "CLIENT_SECRET")]
    client_secret: String,
    #[serde(rename = "USERNAME")]
    username: String,
    #[serde(rename = "PASSWORD")]
    password: String,
}

impl From<LegacyXmlConfig> for FileConfig {
    fn from(xml: LegacyXmlConfig) -> Self {
        Self {
            credentials: Credentials {
                auth_url: xml.auth_url.trim().to_string(),
                client_id: xml.client_id.trim().to_string(),
                client_secret: xml.client_secret,
                username: xml.username.trim().to_string(),
                password: xml.password,
            },
            source: SourceConfig {
                app_url: xml.app_url.trim().to_string(),
                auth_timeout_secs: None,
                fetch_timeout_secs: None,
            },
            eam: None,
            sync: SyncOptions::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Load configuration from a file and the process environment.
///
/// If `path` is `None`, probes the standard locations (see module docs).
///
/// # Errors
/// Returns `TrackSyncError::Config` if:
/// - No config file is found, or the given one does not exist
/// - The file format is invalid
/// - A required field is missing or invalid after the environment overlay
pub fn load(path: Option<PathBuf>) -> Result<Config> {
    let file = read_file_config(path)?;
    let config = resolve(file, |key| std::env::var(key).ok())?;
    validate(&config)?;
    Ok(config)
}

/// Load configuration from a file only, ignoring the environment.
///
/// # Errors
/// Same as [`load`]; the file must then carry a complete `eam` section.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let file = read_file_config(path)?;
    let config = resolve(file, |_| None)?;
    validate(&config)?;
    Ok(config)
}

fn read_file_config(path: Option<PathBuf>) -> Result<FileConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(TrackSyncError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            TrackSyncError::Config(format!(
                "No config file found; looked for {}",
                CONFIG_FILE_NAMES.join(", ")
            ))
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path).map_err(|e| {
        let infra: InfraError = e.into();
        TrackSyncError::from(infra)
    })?;

    parse_config(&contents, &config_path)
}

/// Parse configuration content; format is detected by file extension.
fn parse_config(contents: &str, path: &Path) -> Result<FileConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| TrackSyncError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| TrackSyncError::Config(format!("Invalid JSON format: {}", e))),
        "xml" => quick_xml::de::from_str::<LegacyXmlConfig>(contents)
            .map(FileConfig::from)
            .map_err(|e| TrackSyncError::Config(format!("Invalid XML format: {}", e))),
        _ => Err(TrackSyncError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe the standard locations for a configuration file.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Merge the file contents with values from `lookup` (the environment in
/// production). Non-empty environment values win over the file.
fn resolve<F>(file: FileConfig, lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let env = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
    let eam = file.eam.unwrap_or_default();

    let eam = EamConfig {
        url: env("EAM_URL").or(eam.url).unwrap_or_default(),
        user: env("EAM_USER").or(eam.user).unwrap_or_default(),
        password: env("EAM_PASS").or(eam.password).unwrap_or_default(),
        tenant: env("EAM_TENANT").or(eam.tenant).unwrap_or_default(),
        organization: env("EAM_ORG").or(eam.organization).unwrap_or_default(),
        origin_marker: eam.origin_marker.unwrap_or_else(|| DEFAULT_ORIGIN_MARKER.to_string()),
        timeout_secs: eam.timeout_secs.unwrap_or(DEFAULT_SUBMIT_TIMEOUT_SECS),
    };

    let mut sync = file.sync;
    if let Some(raw) = env("TRACKSYNC_SUBMIT_CONCURRENCY") {
        sync.submit_concurrency = raw.trim().parse::<usize>().map_err(|e| {
            TrackSyncError::Config(format!("Invalid TRACKSYNC_SUBMIT_CONCURRENCY: {}", e))
        })?;
    }

    let mut logging = file.logging;
    if let Some(path) = env("TRACKSYNC_LOG_FILE") {
        logging.file = path;
    }

    Ok(Config { credentials: file.credentials, source: file.source, eam, sync, logging })
}

/// Check every required field; the error names the first offending one.
fn validate(config: &Config) -> Result<()> {
    require_url("credentials.auth_url", &config.credentials.auth_url)?;
    require("credentials.client_id", &config.credentials.client_id)?;
    require("credentials.client_secret", &config.credentials.client_secret)?;
    require("credentials.username", &config.credentials.username)?;
    require("credentials.password", &config.credentials.password)?;

    require_url("source.app_url", &config.source.app_url)?;
    require_positive_opt("source.auth_timeout_secs", config.source.auth_timeout_secs)?;
    require_positive_opt("source.fetch_timeout_secs", config.source.fetch_timeout_secs)?;

    require_url("eam.url (EAM_URL)", &config.eam.url)?;
    require("eam.user (EAM_USER)", &config.eam.user)?;
    require("eam.password (EAM_PASS)", &config.eam.password)?;
    require("eam.tenant (EAM_TENANT)", &config.eam.tenant)?;
    require("eam.organization (EAM_ORG)", &config.eam.organization)?;
    require("eam.origin_marker", &config.eam.origin_marker)?;
    require_positive_opt("eam.timeout_secs", Some(config.eam.timeout_secs))?;

    if config.sync.submit_concurrency == 0 {
        return Err(TrackSyncError::Config(
            "sync.submit_concurrency must be at least 1".to_string(),
        ));
    }

    require("logging.file", &config.logging.file)?;
    Ok(())
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TrackSyncError::Config(format!("Missing required setting: {}", field)));
    }
    Ok(())
}

fn require_url(field: &str, value: &str) -> Result<()> {
    require(field, value)?;
    Url::parse(value.trim())
        .map(|_| ())
        .map_err(|e| TrackSyncError::Config(format!("Invalid URL for {}: {}", field, e)))
}

fn require_positive_opt(field: &str, value: Option<u64>) -> Result<()> {
    match value {
        Some(0) => Err(TrackSyncError::Config(format!("{} must be at least 1", field))),
        _ => Ok(()),
    }
}
