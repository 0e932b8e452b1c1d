mod calculation;
mod calculation_record;
mod protein_source;
mod quality_rating;
mod statistics;

pub use calculation::{CalculationInput, CalculationMethod, CalculationResult};
pub use calculation_record::CalculationRecord;
pub use protein_source::{ProteinCategory, ProteinSource, QualityScore};
pub use quality_rating::{DigestibilityBand, ProteinQualityRating, QualityRating};
pub use statistics::CalculationStatistics;
