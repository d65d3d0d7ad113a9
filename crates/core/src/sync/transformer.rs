//! Source record → interface transaction.
//!
//! Required fields (`RequisicaoNumero`, `ItemCodigo`) must be present and
//! not falsy, otherwise the record is skipped. Optional fields fall back to
//! fixed sentinels when absent or falsy:
//!
//! | field                | fallback               |
//! |----------------------|------------------------|
//! | `ItemQuantidade`     | `0`                    |
//! | `FinalizacaoData`    | `DATA-INVALIDA`        |
//! | `EntregaUnidadeNome` | `NAVIO_DESCONHECIDO`   |
//!
//! An explicit quantity of `0` is falsy and therefore replaced by the default
//! `0`, which leaves the wire value unchanged.

use tracksync_domain::constants::{
    DEFAULT_ITEM_QUANTITY, FIELD_ITEM_CODE, FIELD_REQUEST_NUMBER, INVALID_DATE_SENTINEL,
    UNKNOWN_VESSEL_SENTINEL,
};
use tracksync_domain::{Scalar, SourceRecord, Transaction, ValidationSkip};

/// Validates records and fills in sentinels for missing optional fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordTransformer;

impl RecordTransformer {
    /// Create a new transformer instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Build a transaction from `record`, or explain why it must be skipped.
    ///
    /// Pure and deterministic: the same record always yields the same result.
    ///
    /// # Errors
    /// [`ValidationSkip`] naming every required field that is missing.
    pub fn transform(&self, record: &SourceRecord) -> Result<Transaction, ValidationSkip> {
        let request_number = Scalar::truthy(record.request_number.as_ref());
        let item_code = Scalar::truthy(record.item_code.as_ref());

        let (Some(request_number), Some(item_code)) = (request_number, item_code) else {
            let mut missing = Vec::with_capacity(2);
            if request_number.is_none() {
                missing.push(FIELD_REQUEST_NUMBER);
            }
            if item_code.is_none() {
                missing.push(FIELD_ITEM_CODE);
            }
            return Err(ValidationSkip::new(missing));
        };

        let item_quantity = Scalar::truthy(record.item_quantity.as_ref())
            .cloned()
            .unwrap_or_else(|| Scalar::from(DEFAULT_ITEM_QUANTITY));

        Ok(Transaction {
            request_number: request_number.clone(),
            item_code: item_code.to_string(),
            item_quantity,
            completion_date: text_or(record.completion_date.as_ref(), INVALID_DATE_SENTINEL),
            delivery_unit_name: text_or(
                record.delivery_unit_name.as_ref(),
                UNKNOWN_VESSEL_SENTINEL,
            ),
        })
    }
}

fn text_or(value: Option<&Scalar>, sentinel: &str) -> String {
    Scalar::truthy(value).map_or_else(|| sentinel.to_string(), ToString::to_string)
}
