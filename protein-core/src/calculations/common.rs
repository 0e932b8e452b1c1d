//! Shared constants and Daily Value conversions.
//!
//! The protein Daily Value is the fixed regulatory reference of 50 g/day. It
//! is not user-configurable.

/// Regulatory reference Daily Value for protein, in grams per day.
pub const DAILY_VALUE_PROTEIN_GRAMS: f64 = 50.0;

/// Score applied to sources that carry neither a DIAAS nor a PDCAAS score.
///
/// Product policy: an unscored source is treated as moderately good rather
/// than excluded. Only the main calculation uses it; ranking uses zero.
pub const UNSCORED_SOURCE_SCORE: f64 = 0.75;

/// A DV-derived amount further than this from the stated amount is reported.
pub const DV_DISCREPANCY_THRESHOLD_GRAMS: f64 = 0.5;

/// Converts a Daily Value percentage into grams of protein.
///
/// # Arguments
///
/// * `dv_percentage` - Percent of the protein Daily Value (e.g. `25.0`)
///
/// # Examples
///
/// ```
/// use protein_core::calculations::common::calculate_protein_from_dv;
///
/// assert_eq!(calculate_protein_from_dv(25.0), 12.5);
/// assert_eq!(calculate_protein_from_dv(100.0), 50.0);
/// ```
pub fn calculate_protein_from_dv(dv_percentage: f64) -> f64 {
    (dv_percentage / 100.0) * DAILY_VALUE_PROTEIN_GRAMS
}

/// Converts grams of protein into a Daily Value percentage.
///
/// # Examples
///
/// ```
/// use protein_core::calculations::common::calculate_dv_from_protein;
///
/// assert_eq!(calculate_dv_from_protein(12.5), 25.0);
/// ```
pub fn calculate_dv_from_protein(protein_grams: f64) -> f64 {
    (protein_grams / DAILY_VALUE_PROTEIN_GRAMS) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protein_from_dv_uses_fifty_gram_reference() {
        assert_eq!(calculate_protein_from_dv(0.0), 0.0);
        assert_eq!(calculate_protein_from_dv(10.0), 5.0);
        assert_eq!(calculate_protein_from_dv(200.0), 100.0);
    }

    #[test]
    fn dv_from_protein_uses_fifty_gram_reference() {
        assert_eq!(calculate_dv_from_protein(50.0), 100.0);
        assert_eq!(calculate_dv_from_protein(5.0), 10.0);
    }

    #[test]
    fn conversions_are_inverses() {
        for dv in [0.0, 1.0, 8.0, 25.0, 50.0, 64.0, 100.0, 250.0, -20.0] {
            let back = calculate_dv_from_protein(calculate_protein_from_dv(dv));
            assert!((back - dv).abs() < 1e-9, "{dv} came back as {back}");
        }
    }

    #[test]
    fn conversions_do_not_panic_on_non_finite_input() {
        assert!(calculate_protein_from_dv(f64::NAN).is_nan());
        assert_eq!(calculate_dv_from_protein(f64::INFINITY), f64::INFINITY);
    }
}
