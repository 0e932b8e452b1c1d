//! Explicit input validation.
//!
//! [`calculate_digestible_protein`] accepts anything and returns degenerate
//! numbers for bad input. Front ends that want a reported error run the checks
//! here first.
//!
//! [`calculate_digestible_protein`]: crate::calculations::calculate_digestible_protein

use thiserror::Error;
use tracing::warn;

use crate::models::{CalculationInput, ProteinSource};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("stated protein is required")]
    MissingStatedProtein,

    #[error("{field} must be a valid number, got '{input}'")]
    InvalidNumber { field: &'static str, input: String },

    #[error("stated protein must be greater than zero, got {0}")]
    NonPositiveStatedProtein(f64),

    #[error("daily value percentage must be a finite number, got {0}")]
    NonFiniteDvPercentage(f64),

    #[error("no protein source selected")]
    NoSourceSelected,
}

impl CalculationInput {
    /// Checks the preconditions the calculation itself does not enforce.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.stated_protein.is_finite() || self.stated_protein <= 0.0 {
            return Err(ValidationError::NonPositiveStatedProtein(
                self.stated_protein,
            ));
        }
        match self.dv_percentage {
            Some(dv_percentage) if !dv_percentage.is_finite() => {
                Err(ValidationError::NonFiniteDvPercentage(dv_percentage))
            }
            _ => Ok(()),
        }
    }
}

/// Trims whitespace and removes commas used as thousands separators.
fn normalize_number_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Builds a [`CalculationInput`] from raw form text.
///
/// * `stated_protein` must parse as a positive, finite number.
/// * `dv_percentage` is optional: empty text, a value of zero, or text that
///   does not parse all mean "no DV%". Unparseable text is logged.
/// * A source must be selected.
pub fn parse_calculation_input(
    stated_protein: &str,
    dv_percentage: &str,
    source: Option<&ProteinSource>,
) -> Result<CalculationInput, ValidationError> {
    let normalized = normalize_number_input(stated_protein);
    if normalized.is_empty() {
        return Err(ValidationError::MissingStatedProtein);
    }
    let stated: f64 = normalized
        .parse()
        .map_err(|_| ValidationError::InvalidNumber {
            field: "stated protein",
            input: stated_protein.to_string(),
        })?;

    let dv = parse_optional_dv(dv_percentage);

    let protein_source = source.ok_or(ValidationError::NoSourceSelected)?;

    let input = CalculationInput {
        stated_protein: stated,
        dv_percentage: dv,
        protein_source: protein_source.clone(),
    };
    input.validate()?;
    Ok(input)
}

fn parse_optional_dv(s: &str) -> Option<f64> {
    let normalized = normalize_number_input(s);
    if normalized.is_empty() {
        return None;
    }
    match normalized.parse::<f64>() {
        Ok(value) if value == 0.0 => None,
        Ok(value) => Some(value),
        Err(e) => {
            warn!(input = %s, "ignoring invalid daily value percentage: {}", e);
            None
        }
    }
}
