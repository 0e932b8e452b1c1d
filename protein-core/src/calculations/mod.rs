//! Protein quality calculations.
//!
//! Every function in this module is pure and synchronous and may be called
//! from any thread without coordination.

pub mod common;
pub mod digestible;
pub mod quality;
pub mod score;
pub mod validation;

pub use common::{
    DAILY_VALUE_PROTEIN_GRAMS, DV_DISCREPANCY_THRESHOLD_GRAMS, UNSCORED_SOURCE_SCORE,
    calculate_dv_from_protein, calculate_protein_from_dv,
};
pub use digestible::{
    calculate_digestible_protein, create_calculation_record, create_calculation_record_at,
};
pub use quality::{
    compare_protein_quality, digestibility_band, get_digestibility_color,
    get_protein_quality_rating,
};
pub use score::{calculation_score, ranking_score};
pub use validation::{ValidationError, parse_calculation_input};
