use protein_core::calculations::digestibility_band;

/// Grams with one decimal, e.g. `12.5g`.
pub fn format_protein_amount(grams: f64) -> String {
    format!("{grams:.1}g")
}

/// One decimal with a percent sign, e.g. `36.4%`.
pub fn format_percentage(percentage: f64) -> String {
    format!("{percentage:.1}%")
}

/// A quality score with two decimals, or "-" when the source has none.
pub fn format_score(score: Option<f64>) -> String {
    score
        .map(|s| format!("{s:.2}"))
        .unwrap_or_else(|| "-".to_string())
}

/// Percentage followed by its digestibility band, e.g. `36.4% (low)`.
pub fn format_quality_percentage(percentage: f64) -> String {
    format!(
        "{} ({})",
        format_percentage(percentage),
        digestibility_band(percentage).label()
    )
}
