use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QualityRating {
    Excellent,
    High,
    Good,
    Fair,
    Poor,
    Incomplete,
}

impl QualityRating {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::High => "High",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
            Self::Incomplete => "Incomplete",
        }
    }

    pub fn hex_color(&self) -> &'static str {
        match self {
            Self::Excellent => "#1B5E20",
            Self::High => "#2E7D32",
            Self::Good => "#F57F17",
            Self::Fair => "#E65100",
            Self::Poor => "#C62828",
            Self::Incomplete => "#B71C1C",
        }
    }
}

impl std::fmt::Display for QualityRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProteinQualityRating {
    pub rating: QualityRating,
    pub description: &'static str,
}

/// Three-band classification of a protein quality percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestibilityBand {
    Low,
    Moderate,
    High,
}

impl DigestibilityBand {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }

    pub fn hex_color(&self) -> &'static str {
        match self {
            Self::Low => "#FF5252",
            Self::Moderate => "#FFD54F",
            Self::High => "#66BB6A",
        }
    }
}
