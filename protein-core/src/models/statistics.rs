use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationStatistics {
    pub total_calculations: usize,
    pub average_stated_protein: f64,
    pub average_quality_adjusted_protein: f64,
    /// Up to five `(source name, count)` pairs, most used first.
    pub most_used_sources: Vec<(String, usize)>,
}
