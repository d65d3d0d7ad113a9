//! Application constants
//!
//! Centralized location for the wire names, sentinels and fixed transaction
//! codes shared by the transformer and the EAM envelope builder.

// Required source record keys, as named in skip reasons
pub const FIELD_REQUEST_NUMBER: &str = "RequisicaoNumero";
pub const FIELD_ITEM_CODE: &str = "ItemCodigo";

// Sentinels for missing optional fields
pub const DEFAULT_ITEM_QUANTITY: i64 = 0;
pub const INVALID_DATE_SENTINEL: &str = "DATA-INVALIDA";
pub const UNKNOWN_VESSEL_SENTINEL: &str = "NAVIO_DESCONHECIDO";

// Fixed EAM interface transaction fields
pub const EAM_SOURCE_SYSTEM: &str = "MULTI";
pub const EAM_SOURCE_CODE: &str = "APIT";
pub const EAM_TRANS_CODE: &str = "M201";
pub const EAM_SESSION_ID: &str = "102";
pub const EAM_PROMPT_SOURCE: &str = "MULTIPEX";
pub const EAM_SOAP_ACTION: &str = "AddInterfaceTransactions";

/// Substring whose presence in a 200 response proves a transaction was created.
pub const TRANSID_MARKER: &str = "<TRANSID";

// Defaults
pub const DEFAULT_ORIGIN_MARKER: &str = "PYTHO";
pub const DEFAULT_SUBMIT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SUBMIT_CONCURRENCY: usize = 1;
pub const DEFAULT_LOG_FILE: &str = "tracking_sync.log";
pub const DEFAULT_LOG_LEVEL: &str = "info";
