//! Immutable protein source catalog.
//!
//! A [`ProteinCatalog`] is built once from a list of sources and handed to
//! whatever needs lookup or search. Nothing mutates it afterwards.

use std::collections::HashSet;

use thiserror::Error;

use crate::calculations::compare_protein_quality;
use crate::models::{ProteinCategory, ProteinSource};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("source '{0}' is assigned the filter-only category 'all'")]
    FilterOnlyCategory(String),

    #[error("source '{0}' has an empty name")]
    EmptyName(String),

    #[error("duplicate source id '{0}'")]
    DuplicateId(String),

    #[error("source '{id}' has invalid {field} {value}; scores must be finite and non-negative")]
    InvalidScore {
        id: String,
        field: &'static str,
        value: f64,
    },
}

fn check_score(id: &str, field: &'static str, score: Option<f64>) -> Result<(), CatalogError> {
    match score {
        Some(value) if !value.is_finite() || value < 0.0 => Err(CatalogError::InvalidScore {
            id: id.to_string(),
            field,
            value,
        }),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProteinCatalog {
    sources: Vec<ProteinSource>,
}

impl ProteinCatalog {
    /// Builds a catalog, rejecting sources that break catalog invariants.
    ///
    /// # Errors
    /// * [`CatalogError::FilterOnlyCategory`] - a source uses [`ProteinCategory::All`].
    /// * [`CatalogError::EmptyName`] - a source name is blank.
    /// * [`CatalogError::DuplicateId`] - two sources share an id.
    /// * [`CatalogError::InvalidScore`] - a score is negative, NaN or infinite.
    pub fn new(sources: Vec<ProteinSource>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for source in &sources {
            if source.category == ProteinCategory::All {
                return Err(CatalogError::FilterOnlyCategory(source.id.clone()));
            }
            if source.name.trim().is_empty() {
                return Err(CatalogError::EmptyName(source.id.clone()));
            }
            if !seen.insert(source.id.as_str()) {
                return Err(CatalogError::DuplicateId(source.id.clone()));
            }
            check_score(&source.id, "DIAAS score", source.diaas_score)?;
            check_score(&source.id, "PDCAAS score", source.pdcaas_score)?;
        }
        Ok(Self { sources })
    }

    /// Sources in load order.
    pub fn sources(&self) -> &[ProteinSource] {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ProteinSource> {
        self.sources.iter().find(|s| s.id == id)
    }

    /// Case-insensitive exact name match.
    pub fn find_by_name(&self, name: &str) -> Option<&ProteinSource> {
        let wanted = name.trim().to_lowercase();
        self.sources.iter().find(|s| s.name.to_lowercase() == wanted)
    }

    /// Looks `key` up as an id first, then as a name.
    pub fn resolve(&self, key: &str) -> Option<&ProteinSource> {
        self.get(key.trim()).or_else(|| self.find_by_name(key))
    }

    /// Sources in `category`, sorted by name. [`ProteinCategory::All`] returns every source.
    pub fn sources_for(&self, category: ProteinCategory) -> Vec<&ProteinSource> {
        let mut sources: Vec<_> = self
            .sources
            .iter()
            .filter(|s| category.matches(s.category))
            .collect();
        sources.sort_by(|a, b| a.name.cmp(&b.name));
        sources
    }

    /// Case-insensitive substring search over names and descriptions.
    /// An empty query returns everything in `category`.
    pub fn search(&self, query: &str, category: ProteinCategory) -> Vec<&ProteinSource> {
        let sources = self.sources_for(category);
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return sources;
        }
        sources
            .into_iter()
            .filter(|s| {
                s.name.to_lowercase().contains(&query)
                    || s
                        .description
                        .as_ref()
                        .is_some_and(|d| d.to_lowercase().contains(&query))
            })
            .collect()
    }

    /// The `limit` best sources by effective score, best first.
    /// Sources without any score rank as zero.
    pub fn highest_quality(&self, limit: usize) -> Vec<&ProteinSource> {
        let mut sources: Vec<_> = self.sources.iter().collect();
        sources.sort_by(|a, b| compare_protein_quality(b, a));
        sources.truncate(limit);
        sources
    }
}
