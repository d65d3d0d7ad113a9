//! Source-side tracking records as delivered by the application API.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Loosely typed scalar as found in source records.
///
/// The source API is not consistent about types: request numbers arrive as
/// integers or strings, quantities as integers, floats or strings. Keeping
/// the original representation lets the envelope reproduce the value exactly
/// as it was received.
///
/// Arrays and objects land in `Structured` so that one odd record never
/// breaks deserialization of the whole batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    Structured(serde_json::Value),
}

impl Scalar {
    /// A scalar is falsy when it is `false`, numerically zero, the empty
    /// string, or an empty array or object. Whitespace is not empty.
    pub fn is_falsy(&self) -> bool {
        match self {
            Self::Bool(value) => !value,
            Self::Number(number) => number.as_f64().is_some_and(|value| value == 0.0),
            Self::Text(text) => text.is_empty(),
            Self::Structured(value) => match value {
                serde_json::Value::Array(items) => items.is_empty(),
                serde_json::Value::Object(fields) => fields.is_empty(),
                serde_json::Value::Null => true,
                _ => false,
            },
        }
    }

    /// Borrow `value` only when it is present and not falsy.
    pub fn truthy(value: Option<&Self>) -> Option<&Self> {
        value.filter(|scalar| !scalar.is_falsy())
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
            // Compact JSON text.
            Self::Structured(value) => write!(f, "{value}"),
        }
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// One shipment-tracking record from `results.data`.
///
/// Every field is optional: absent keys and explicit `null` both deserialize
/// to `None`. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    #[serde(rename = "RequisicaoNumero", default, skip_serializing_if = "Option::is_none")]
    pub request_number: Option<Scalar>,

    #[serde(rename = "ItemCodigo", default, skip_serializing_if = "Option::is_none")]
    pub item_code: Option<Scalar>,

    #[serde(rename = "ItemQuantidade", default, skip_serializing_if = "Option::is_none")]
    pub item_quantity: Option<Scalar>,

    /// Completion date, passed through verbatim (no date parsing).
    #[serde(rename = "FinalizacaoData", default, skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<Scalar>,

    /// Vessel / delivery unit name.
    #[serde(rename = "EntregaUnidadeNome", default, skip_serializing_if = "Option::is_none")]
    pub delivery_unit_name: Option<Scalar>,
}
