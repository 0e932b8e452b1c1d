//! Score resolution policies.
//!
//! Both policies start from [`QualityScore`], which already encodes the
//! DIAAS-over-PDCAAS priority. They differ only in how a source without any
//! score is treated:
//!
//! | Policy      | Missing score becomes | Used by                               |
//! |-------------|-----------------------|---------------------------------------|
//! | calculation | 0.75, reported DIAAS  | [`calculate_digestible_protein`]      |
//! | ranking     | 0                     | comparison, rating, top-source lists  |
//!
//! The two defaults are intentionally different and must stay that way.
//!
//! [`calculate_digestible_protein`]: crate::calculations::calculate_digestible_protein

use crate::calculations::common::UNSCORED_SOURCE_SCORE;
use crate::models::{CalculationMethod, ProteinSource, QualityScore};

/// Score and method applied by the main calculation.
pub fn calculation_score(score: QualityScore) -> (f64, CalculationMethod) {
    match score {
        QualityScore::Diaas(value) => (value, CalculationMethod::Diaas),
        QualityScore::Pdcaas(value) => (value, CalculationMethod::Pdcaas),
        QualityScore::Missing => (UNSCORED_SOURCE_SCORE, CalculationMethod::Diaas),
    }
}

/// Effective score used to compare and classify sources.
pub fn ranking_score(source: &ProteinSource) -> f64 {
    source.quality_score().value().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProteinCategory;

    #[test]
    fn calculation_policy_falls_back_to_default_score() {
        assert_eq!(
            calculation_score(QualityScore::Missing),
            (0.75, CalculationMethod::Diaas)
        );
        assert_eq!(
            calculation_score(QualityScore::Pdcaas(0.52)),
            (0.52, CalculationMethod::Pdcaas)
        );
    }

    #[test]
    fn ranking_policy_falls_back_to_zero() {
        let bcaa = ProteinSource {
            id: "bcaa-powder".to_string(),
            name: "BCAA Powder".to_string(),
            category: ProteinCategory::Supplement,
            diaas_score: None,
            pdcaas_score: None,
            description: None,
        };

        assert_eq!(ranking_score(&bcaa), 0.0);
    }
}
