//! CSV loader for protein source catalogs.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter. Whitespace
//! around values is ignored and empty cells mean "not available".
//!
//! | Column         | Required | Type   | Notes                                          |
//! |----------------|----------|--------|------------------------------------------------|
//! | `id`           | yes      | string | Stable identifier, unique within the file      |
//! | `name`         | yes      | string | Display name                                   |
//! | `category`     | yes      | string | `meat`, `dairy`, `plant`, `supplement`, `other` |
//! | `diaas_score`  | no       | number | e.g. `1.25`                                    |
//! | `pdcaas_score` | no       | number | e.g. `1.0`                                     |
//! | `description`  | no       | string |                                                |
//!
//! ```csv
//! id,name,category,diaas_score,pdcaas_score,description
//! tempeh,Tempeh,plant,0.79,,Fermented soybean cake
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};

use protein_core::{CatalogError, ProteinCatalog, ProteinCategory, ProteinSource};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

const BUILT_IN_CATALOG: &str = include_str!("../data/protein_sources.csv");

#[derive(Debug, Error)]
pub enum CatalogLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    /// `row` is 1-based, not counting the header.
    #[error("unrecognised category '{category}' on row {row}")]
    UnknownCategory { category: String, row: usize },

    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<csv::Error> for CatalogLoaderError {
    fn from(err: csv::Error) -> Self {
        CatalogLoaderError::CsvParse(err.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    id: String,
    name: String,
    category: String,
    diaas_score: Option<f64>,
    pdcaas_score: Option<f64>,
    description: Option<String>,
}

fn convert_row(row: CatalogRow, row_number: usize) -> Result<ProteinSource, CatalogLoaderError> {
    let category = ProteinCategory::parse(&row.category).ok_or_else(|| {
        CatalogLoaderError::UnknownCategory {
            category: row.category.clone(),
            row: row_number,
        }
    })?;

    Ok(ProteinSource {
        id: row.id,
        name: row.name,
        category,
        diaas_score: row.diaas_score,
        pdcaas_score: row.pdcaas_score,
        description: row.description.filter(|d| !d.is_empty()),
    })
}

pub struct CatalogLoader;

impl CatalogLoader {
    /// Parse protein sources from CSV. Rows are returned in file order.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<ProteinSource>, CatalogLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(false)
            .from_reader(reader);

        csv_reader
            .deserialize::<CatalogRow>()
            .enumerate()
            .map(|(idx, result)| convert_row(result?, idx + 1))
            .collect()
    }

    /// Read a CSV file and build a validated catalog from it.
    pub fn load_file(path: &Path) -> Result<ProteinCatalog, CatalogLoaderError> {
        let file = std::fs::File::open(path).map_err(|source| CatalogLoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let sources = Self::parse(file)?;
        info!(path = %path.display(), sources = sources.len(), "loaded protein catalog");
        Ok(ProteinCatalog::new(sources)?)
    }
}

/// The catalog shipped with the crate.
pub fn default_catalog() -> Result<ProteinCatalog, CatalogLoaderError> {
    let sources = CatalogLoader::parse(BUILT_IN_CATALOG.as_bytes())?;
    debug!(sources = sources.len(), "loaded built-in protein catalog");
    Ok(ProteinCatalog::new(sources)?)
}

/// Loads `path` when given, otherwise the built-in catalog.
pub fn load_catalog(path: Option<&Path>) -> Result<ProteinCatalog, CatalogLoaderError> {
    match path {
        Some(path) => CatalogLoader::load_file(path),
        None => default_catalog(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const HEADER: &str = "id,name,category,diaas_score,pdcaas_score,description\n";

    fn parse(body: &str) -> Result<Vec<ProteinSource>, CatalogLoaderError> {
        CatalogLoader::parse(format!("{HEADER}{body}").as_bytes())
    }

    #[test]
    fn parses_full_row() {
        let sources = parse("quinoa,Quinoa,plant,0.84,0.73,Complete grain protein\n").unwrap();

        assert_eq!(
            sources,
            vec![ProteinSource {
                id: "quinoa".to_string(),
                name: "Quinoa".to_string(),
                category: ProteinCategory::Plant,
                diaas_score: Some(0.84),
                pdcaas_score: Some(0.73),
                description: Some("Complete grain protein".to_string()),
            }]
        );
    }

    #[test]
    fn empty_cells_are_none() {
        let sources = parse("bcaa-powder,BCAA Powder,supplement,,,\n").unwrap();

        assert_eq!(sources[0].diaas_score, None);
        assert_eq!(sources[0].pdcaas_score, None);
        assert_eq!(sources[0].description, None);
    }

    #[test]
    fn category_is_case_insensitive() {
        let sources = parse("oats,Oats,Plant,0.54,0.57,\n").unwrap();

        assert_eq!(sources[0].category, ProteinCategory::Plant);
    }

    #[test]
    fn unknown_category_reports_row() {
        let err = parse("oats,Oats,plant,0.54,,\nkelp,Kelp,seaweed,,,\n").unwrap_err();

        match err {
            CatalogLoaderError::UnknownCategory { category, row } => {
                assert_eq!(category, "seaweed");
                assert_eq!(row, 2);
            }
            other => panic!("expected UnknownCategory, got {other:?}"),
        }
    }

    #[test]
    fn bad_score_is_parse_error() {
        let err = parse("oats,Oats,plant,high,,\n").unwrap_err();

        assert!(matches!(err, CatalogLoaderError::CsvParse(_)), "got {err:?}");
    }

    #[test]
    fn negative_or_nan_score_fails_catalog_validation() {
        for row in ["neg,Neg,plant,-0.5,,\n", "nan,NaN Bar,other,NaN,,\n", "inf,Inf Bar,other,,inf,\n"] {
            let sources = parse(row).expect("numbers parse");

            let err = ProteinCatalog::new(sources).unwrap_err();

            assert!(matches!(err, CatalogError::InvalidScore { .. }), "{row}: got {err:?}");
        }
    }

    #[test]
    fn missing_column_is_parse_error() {
        let err = CatalogLoader::parse("id,name\noats,Oats\n".as_bytes()).unwrap_err();

        let CatalogLoaderError::CsvParse(msg) = err else {
            panic!("expected CsvParse error, got: {err:?}");
        };
        assert!(msg.contains("missing field"), "got: {msg}");
    }

    #[test]
    fn header_only_is_empty() {
        assert!(parse("").unwrap().is_empty());
    }

    // =========================================================================
    // built-in catalog
    // =========================================================================

    #[test]
    fn built_in_catalog_is_valid() {
        let catalog = default_catalog().unwrap();

        assert_eq!(catalog.len(), 37);
        assert!(catalog.sources().iter().all(|s| s.category != ProteinCategory::All));
    }

    #[test]
    fn built_in_catalog_has_one_unscored_source() {
        let catalog = default_catalog().unwrap();

        let unscored: Vec<_> = catalog
            .sources()
            .iter()
            .filter(|s| s.diaas_score.is_none() && s.pdcaas_score.is_none())
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(unscored, vec!["bcaa-powder"]);
    }

    #[test]
    fn built_in_catalog_ranks_whey_isolate_first() {
        let catalog = default_catalog().unwrap();

        let top = catalog.highest_quality(1);
        assert_eq!(top[0].id, "whey-protein-isolate");
    }

    #[test]
    fn quoted_description_keeps_comma() {
        let catalog = default_catalog().unwrap();

        let chicken = catalog.get("chicken-breast").unwrap();
        assert_eq!(chicken.description.as_deref(), Some("Lean, complete protein source"));
    }

    #[test]
    fn load_catalog_without_path_is_built_in() {
        assert_eq!(load_catalog(None).unwrap(), default_catalog().unwrap());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_catalog(Some(Path::new("/definitely/not/here.csv"))).unwrap_err();

        assert!(matches!(err, CatalogLoaderError::Io { .. }), "got {err:?}");
    }
}
