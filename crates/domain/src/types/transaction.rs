//! Submission-ready interface transactions and validation skips.

use std::fmt;

use serde::Serialize;

use super::record::Scalar;

/// Normalized form of a [`SourceRecord`](super::SourceRecord) with every
/// field resolved, either from the record or from its sentinel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub request_number: Scalar,
    pub item_code: String,
    pub item_quantity: Scalar,
    pub completion_date: String,
    pub delivery_unit_name: String,
}

/// Why a record was not turned into a transaction.
///
/// Carries the wire names of the required fields that were missing or falsy,
/// in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationSkip {
    missing: Vec<&'static str>,
}

impl ValidationSkip {
    pub fn new(missing: Vec<&'static str>) -> Self {
        Self { missing }
    }

    pub fn missing_fields(&self) -> &[&'static str] {
        &self.missing
    }
}

impl fmt::Display for ValidationSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing {}", self.missing.join(", "))
    }
}
