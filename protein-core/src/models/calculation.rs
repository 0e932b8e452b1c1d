use serde::{Deserialize, Serialize};

use super::ProteinSource;

/// Which score family produced a calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalculationMethod {
    #[serde(rename = "DIAAS")]
    Diaas,
    #[serde(rename = "PDCAAS")]
    Pdcaas,
}

impl CalculationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Diaas => "DIAAS",
            Self::Pdcaas => "PDCAAS",
        }
    }

    /// Case-insensitive inverse of [`as_str`](Self::as_str).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DIAAS" => Some(Self::Diaas),
            "PDCAAS" => Some(Self::Pdcaas),
            _ => None,
        }
    }
}

impl std::fmt::Display for CalculationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One user request: a stated protein amount, an optional Daily Value
/// percentage from the label, and the selected source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationInput {
    /// Grams of protein printed on the label. Expected to be positive.
    pub stated_protein: f64,
    /// Percent of the protein Daily Value, only applied when greater than zero.
    pub dv_percentage: Option<f64>,
    pub protein_source: ProteinSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub quality_adjusted_protein: f64,
    /// Quality-adjusted protein as a percentage of the stated amount.
    /// Exceeds 100 for sources scoring above 1.0.
    pub protein_quality_percentage: f64,
    pub calculation_method: CalculationMethod,
    /// DV-derived protein amount, present whenever a DV percentage was supplied.
    pub adjusted_protein: Option<f64>,
    pub score_used: f64,
    /// Gap between the DV-derived and stated amounts, when it exceeds 0.5 g.
    pub dv_discrepancy: Option<f64>,
}
