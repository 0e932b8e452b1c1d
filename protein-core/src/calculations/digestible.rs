//! Quality-adjusted protein calculation.
//!
//! Converts a label's protein amount into the amount of protein that counts
//! once the source's amino acid quality is taken into account.
//!
//! # Steps
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Base amount: stated grams, or `(dv / 100) × 50` when a DV% > 0 is given |
//! | 2    | DV discrepancy: `|dv grams − stated|`, reported only above 0.5 g |
//! | 3    | Score: DIAAS, else PDCAAS, else 0.75 reported as DIAAS |
//! | 4    | Quality-adjusted protein: base amount × score |
//! | 5    | Quality percentage: quality-adjusted ÷ **stated** × 100 |
//!
//! The DV-derived amount replaces the stated amount in step 4; the two are
//! never blended. Step 5 always divides by the stated amount, so after a DV
//! substitution the percentage mixes the substitution and the quality effect.
//!
//! The calculation never fails. A zero or negative stated amount produces
//! infinite, NaN or negative percentages; callers that want an error instead
//! should run [`CalculationInput::validate`] first.
//!
//! # Example
//!
//! ```
//! use protein_core::calculations::calculate_digestible_protein;
//! use protein_core::{CalculationInput, CalculationMethod, ProteinCategory, ProteinSource};
//!
//! let chickpeas = ProteinSource {
//!     id: "chickpeas-cooked".to_string(),
//!     name: "Chickpeas (Cooked)".to_string(),
//!     category: ProteinCategory::Plant,
//!     diaas_score: Some(0.58),
//!     pdcaas_score: Some(0.71),
//!     description: None,
//! };
//!
//! let result = calculate_digestible_protein(&CalculationInput {
//!     stated_protein: 20.0,
//!     dv_percentage: Some(25.0),
//!     protein_source: chickpeas,
//! });
//!
//! assert_eq!(result.adjusted_protein, Some(12.5));
//! assert_eq!(result.calculation_method, CalculationMethod::Diaas);
//! assert_eq!(result.dv_discrepancy, Some(7.5));
//! ```

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::calculations::common::{DV_DISCREPANCY_THRESHOLD_GRAMS, calculate_protein_from_dv};
use crate::calculations::score::calculation_score;
use crate::models::{CalculationInput, CalculationRecord, CalculationResult};

/// Calculates quality-adjusted protein for `input`.
pub fn calculate_digestible_protein(input: &CalculationInput) -> CalculationResult {
    let stated_protein = input.stated_protein;

    let mut adjusted_protein = stated_protein;
    let mut dv_discrepancy = None;

    if let Some(dv_percentage) = input.dv_percentage.filter(|dv| *dv > 0.0) {
        let protein_from_dv = calculate_protein_from_dv(dv_percentage);
        adjusted_protein = protein_from_dv;

        let discrepancy = (protein_from_dv - stated_protein).abs();
        if discrepancy > DV_DISCREPANCY_THRESHOLD_GRAMS {
            dv_discrepancy = Some(discrepancy);
        }
    }

    let (score_used, calculation_method) = calculation_score(input.protein_source.quality_score());

    let quality_adjusted_protein = adjusted_protein * score_used;
    let protein_quality_percentage = (quality_adjusted_protein / stated_protein) * 100.0;

    debug!(
        source = %input.protein_source.id,
        stated_protein,
        adjusted_protein,
        score_used,
        method = %calculation_method,
        "calculated quality-adjusted protein"
    );

    CalculationResult {
        quality_adjusted_protein,
        protein_quality_percentage,
        calculation_method,
        adjusted_protein: input.dv_percentage.map(|_| adjusted_protein),
        score_used,
        dv_discrepancy,
    }
}

/// Builds a history record for a finished calculation, stamped now.
pub fn create_calculation_record(
    input: &CalculationInput,
    result: &CalculationResult,
) -> CalculationRecord {
    create_calculation_record_at(input, result, Utc::now())
}

/// Builds a history record with an explicit timestamp and a fresh id.
pub fn create_calculation_record_at(
    input: &CalculationInput,
    result: &CalculationResult,
    timestamp: DateTime<Utc>,
) -> CalculationRecord {
    CalculationRecord {
        id: Uuid::new_v4().to_string(),
        stated_protein: input.stated_protein,
        dv_percentage: input.dv_percentage,
        protein_source: input.protein_source.clone(),
        digestible_protein: result.quality_adjusted_protein,
        digestibility_percentage: result.protein_quality_percentage,
        calculation_method: result.calculation_method,
        timestamp,
    }
}
