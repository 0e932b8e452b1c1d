use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CalculationInput, CalculationMethod, ProteinSource};

/// A persisted calculation. Field names match the JSON export format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationRecord {
    pub id: String,
    pub stated_protein: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dv_percentage: Option<f64>,
    pub protein_source: ProteinSource,
    /// Quality-adjusted protein in grams.
    pub digestible_protein: f64,
    /// Quality-adjusted protein as a percentage of the stated amount.
    pub digestibility_percentage: f64,
    pub calculation_method: CalculationMethod,
    pub timestamp: DateTime<Utc>,
}

impl CalculationRecord {
    /// The input this record was calculated from.
    pub fn input(&self) -> CalculationInput {
        CalculationInput {
            stated_protein: self.stated_protein,
            dv_percentage: self.dv_percentage,
            protein_source: self.protein_source.clone(),
        }
    }
}
