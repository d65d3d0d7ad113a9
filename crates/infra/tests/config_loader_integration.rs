//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files.

use std::io::Write;

use tempfile::Builder;
use tracksync_domain::TrackSyncError;
use tracksync_infra::config;

fn write_temp(contents: &str, suffix: &str) -> tempfile::NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().expect("Failed to create temp file");
    file.write_all(contents.as_bytes()).expect("Failed to write to temp file");
    file
}

#[test]
fn test_load_config_from_toml_file() {
    let toml_content = r#"
[credentials]
auth_url = "https://auth.example.com/realms/multpex/protocol/openid-connect/token"
client_id = "multpex"
client_secret = "client-secret"
username = "sync-user"
password = "sync-password"

[source]
app_url = "https://app.example.com/api/v1/tracking"
auth_timeout_secs = 15

[eam]
url = "https://eam.example.com/axis/services/EWSConnector"
user = "INTEG"
password = "eam-password"
tenant = "ACME_PRD"
organization = "ACME"
origin_marker = "MANUAL"

[sync]
submit_concurrency = 2

[logging]
file = "logs/tracking_sync.log"
level = "debug"
"#;
    let file = write_temp(toml_content, ".toml");

    let config = config::load_from_file(Some(file.path().to_path_buf()))
        .expect("Failed to load config from TOML file");

    // Credentials and source
    assert_eq!(config.credentials.username, "sync-user");
    assert_eq!(config.source.auth_timeout_secs, Some(15));
    assert_eq!(config.source.fetch_timeout_secs, None);

    // EAM
    assert_eq!(config.eam.qualified_user(), "INTEG@ACME_PRD");
    assert_eq!(config.eam.origin_marker, "MANUAL");
    assert_eq!(config.eam.timeout_secs, 30);

    // Tuning and logging
    assert_eq!(config.sync.submit_concurrency, 2);
    assert_eq!(config.logging.file, "logs/tracking_sync.log");
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_xml_without_eam_is_rejected_when_environment_is_ignored() {
    let xml = r#"<multpex_config>
  <SERVIDOR_AUTENTICACAO>https://auth.example.com/token</SERVIDOR_AUTENTICACAO>
  <SERVIDOR_APLICACAO>https://app.example.com/tracking</SERVIDOR_APLICACAO>
  <CLIENT_ID>multpex</CLIENT_ID>
  <CLIENT_SECRET>secret</CLIENT_SECRET>
  <USERNAME>sync</USERNAME>
  <PASSWORD>pw</PASSWORD>
</multpex_config>"#;
    let file = write_temp(xml, ".xml");

    let err = config::load_from_file(Some(file.path().to_path_buf())).unwrap_err();
    match err {
        TrackSyncError::Config(msg) => assert!(msg.contains("eam.url"), "{msg}"),
        other => panic!("expected config error, got {other:?}"),
    }
}

#[test]
fn test_missing_required_section_is_a_config_error() {
    let file = write_temp(r#"{ "credentials": { "auth_url": "https://a" } }"#, ".json");

    let result = config::load_from_file(Some(file.path().to_path_buf()));
    assert!(matches!(result, Err(TrackSyncError::Config(_))));
}

#[test]
fn test_explicit_missing_path_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = config::load(Some(dir.path().join("config.xml")));
    assert!(matches!(result, Err(TrackSyncError::Config(msg)) if msg.contains("not found")));
}
