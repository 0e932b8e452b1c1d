//! JSON export format.
//!
//! An export is a JSON array of [`CalculationRecord`]s with camelCase keys,
//! lowercase category codes, `"DIAAS"`/`"PDCAAS"` method names and RFC 3339
//! timestamps. Second-precision `Z` timestamps from older exports decode too.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::models::CalculationRecord;

#[derive(Debug, Error)]
pub enum HistoryTransferError {
    #[error("invalid history JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub fn encode_history(records: &[CalculationRecord]) -> Result<String, HistoryTransferError> {
    Ok(serde_json::to_string_pretty(records)?)
}

pub fn decode_history(json: &str) -> Result<Vec<CalculationRecord>, HistoryTransferError> {
    Ok(serde_json::from_str(json)?)
}
