use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use protein_core::calculations::get_protein_quality_rating;
use protein_core::{CalculationMethod, QualityScore};
use protein_data::{CatalogLoader, default_catalog};

/// Validate a protein source catalog and print every source with its rating.
///
/// The CSV file must have the columns
/// `id,name,category,diaas_score,pdcaas_score,description`.
/// Without `--file` the built-in catalog is printed.
#[derive(Parser, Debug)]
#[command(name = "protein-catalog")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the catalog CSV file
    #[arg(short, long)]
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let catalog = match &args.file {
        Some(path) => CatalogLoader::load_file(path)
            .with_context(|| format!("Failed to load catalog: {}", path.display()))?,
        None => default_catalog().context("Failed to load built-in catalog")?,
    };

    for source in catalog.highest_quality(catalog.len()) {
        let score = match source.quality_score() {
            QualityScore::Diaas(value) => format!("{value:.2} {}", CalculationMethod::Diaas),
            QualityScore::Pdcaas(value) => format!("{value:.2} {}", CalculationMethod::Pdcaas),
            QualityScore::Missing => "unscored".to_string(),
        };
        let rating = get_protein_quality_rating(source);
        println!(
            "{:<26} {:<28} {:<11} {:<12} {}",
            source.id,
            source.name,
            source.category.as_str(),
            score,
            rating.rating
        );
    }

    println!("{} sources OK.", catalog.len());
    Ok(())
}
