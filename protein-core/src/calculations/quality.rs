//! Quality rating, comparison and digestibility banding.
//!
//! Everything here ranks sources by their effective score with a missing
//! score counted as zero (see [`crate::calculations::score`]).

use std::cmp::Ordering;

use crate::calculations::score::ranking_score;
use crate::models::{DigestibilityBand, ProteinQualityRating, ProteinSource, QualityRating};

/// Upper bound (inclusive) of the low digestibility band, in percent.
pub const LOW_DIGESTIBILITY_MAX: f64 = 40.0;

/// Upper bound (inclusive) of the moderate digestibility band, in percent.
pub const MODERATE_DIGESTIBILITY_MAX: f64 = 80.0;

/// Orders two sources by effective quality score. Incomparable scores are equal.
pub fn compare_protein_quality(a: &ProteinSource, b: &ProteinSource) -> Ordering {
    ranking_score(a)
        .partial_cmp(&ranking_score(b))
        .unwrap_or(Ordering::Equal)
}

/// Classifies a source into one of six quality bands.
///
/// | Effective score | Rating     |
/// |-----------------|------------|
/// | ≥ 1.0           | Excellent  |
/// | [0.8, 1.0)      | High       |
/// | [0.6, 0.8)      | Good       |
/// | [0.4, 0.6)      | Fair       |
/// | (0, 0.4)        | Poor       |
/// | 0 or no score   | Incomplete |
pub fn get_protein_quality_rating(source: &ProteinSource) -> ProteinQualityRating {
    let score = ranking_score(source);

    let (rating, description) = if score >= 1.0 {
        (QualityRating::Excellent, "Complete, high-quality protein")
    } else if score >= 0.8 {
        (QualityRating::High, "Good quality protein with minor limitations")
    } else if score >= 0.6 {
        (QualityRating::Good, "Moderate quality protein")
    } else if score >= 0.4 {
        (QualityRating::Fair, "Lower quality protein")
    } else if score > 0.0 {
        (QualityRating::Poor, "Limited protein quality")
    } else {
        (QualityRating::Incomplete, "Missing essential amino acids")
    };

    ProteinQualityRating {
        rating,
        description,
    }
}

/// Classifies a protein quality percentage. Every display surface shares this.
pub fn digestibility_band(percentage: f64) -> DigestibilityBand {
    if percentage <= LOW_DIGESTIBILITY_MAX {
        DigestibilityBand::Low
    } else if percentage <= MODERATE_DIGESTIBILITY_MAX {
        DigestibilityBand::Moderate
    } else {
        DigestibilityBand::High
    }
}

/// Hex color for a protein quality percentage.
pub fn get_digestibility_color(percentage: f64) -> &'static str {
    digestibility_band(percentage).hex_color()
}
