use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProteinCategory {
    /// Filter-only pseudo-category. Never assigned to a real source.
    All,
    Meat,
    Dairy,
    Plant,
    Supplement,
    Other,
}

impl ProteinCategory {
    pub const ALL: [ProteinCategory; 6] = [
        Self::All,
        Self::Meat,
        Self::Dairy,
        Self::Plant,
        Self::Supplement,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Meat => "meat",
            Self::Dairy => "dairy",
            Self::Plant => "plant",
            Self::Supplement => "supplement",
            Self::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "meat" => Some(Self::Meat),
            "dairy" => Some(Self::Dairy),
            "plant" => Some(Self::Plant),
            "supplement" => Some(Self::Supplement),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::All => "All Sources",
            Self::Meat => "Meat & Fish",
            Self::Dairy => "Dairy & Eggs",
            Self::Plant => "Plant Sources",
            Self::Supplement => "Supplements",
            Self::Other => "Other",
        }
    }

    /// Whether a source of `category` passes this category used as a filter.
    pub fn matches(&self, category: ProteinCategory) -> bool {
        *self == Self::All || *self == category
    }
}

/// A protein quality score resolved in priority order: DIAAS wins over PDCAAS.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QualityScore {
    Diaas(f64),
    Pdcaas(f64),
    Missing,
}

impl QualityScore {
    pub fn resolve(diaas_score: Option<f64>, pdcaas_score: Option<f64>) -> Self {
        match (diaas_score, pdcaas_score) {
            (Some(score), _) => Self::Diaas(score),
            (None, Some(score)) => Self::Pdcaas(score),
            (None, None) => Self::Missing,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Diaas(score) | Self::Pdcaas(score) => Some(*score),
            Self::Missing => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProteinSource {
    pub id: String,
    pub name: String,
    pub category: ProteinCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diaas_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdcaas_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ProteinSource {
    pub fn quality_score(&self) -> QualityScore {
        QualityScore::resolve(self.diaas_score, self.pdcaas_score)
    }
}
