use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::MAX_HISTORY_RECORDS;
use crate::models::{CalculationRecord, CalculationStatistics};

const MOST_USED_SOURCES: usize = 5;

/// Outcome of an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Imported records that made it into the merged history.
    pub imported: usize,
    /// Imported records skipped because their id was already present.
    pub skipped_duplicates: usize,
    /// Records dropped to stay within [`MAX_HISTORY_RECORDS`].
    pub dropped_over_cap: usize,
    /// Size of the resulting history.
    pub total: usize,
}

/// Stable sort by timestamp, newest first. Ties keep their relative order.
pub fn sort_newest_first(records: &mut [CalculationRecord]) {
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

/// Sorts newest first and drops everything past [`MAX_HISTORY_RECORDS`].
/// Returns the number of dropped records.
pub fn cap_history(records: &mut Vec<CalculationRecord>) -> usize {
    sort_newest_first(records);
    let dropped = records.len().saturating_sub(MAX_HISTORY_RECORDS);
    records.truncate(MAX_HISTORY_RECORDS);
    dropped
}

/// Combines an existing history with imported records.
///
/// With `replace_existing` the result is built from `imported` alone.
/// Otherwise imported records whose id is already present are skipped. In
/// both modes repeated ids inside `imported` keep only their first
/// occurrence, and the result is sorted newest first and capped.
pub fn merge_history(
    existing: Vec<CalculationRecord>,
    imported: Vec<CalculationRecord>,
    replace_existing: bool,
) -> (Vec<CalculationRecord>, ImportSummary) {
    let mut merged = if replace_existing { Vec::new() } else { existing };
    let mut seen: HashSet<String> = merged.iter().map(|r| r.id.clone()).collect();
    let mut summary = ImportSummary::default();
    let mut imported_ids = HashSet::new();

    for record in imported {
        if !seen.insert(record.id.clone()) {
            summary.skipped_duplicates += 1;
            continue;
        }
        imported_ids.insert(record.id.clone());
        merged.push(record);
    }

    summary.dropped_over_cap = cap_history(&mut merged);
    summary.imported = merged
        .iter()
        .filter(|r| imported_ids.contains(&r.id))
        .count();
    summary.total = merged.len();

    (merged, summary)
}

/// Totals, averages and the most used sources over `records`.
pub fn calculation_statistics(records: &[CalculationRecord]) -> CalculationStatistics {
    let total_calculations = records.len();
    if total_calculations == 0 {
        return CalculationStatistics {
            total_calculations: 0,
            average_stated_protein: 0.0,
            average_quality_adjusted_protein: 0.0,
            most_used_sources: Vec::new(),
        };
    }

    let count = total_calculations as f64;
    let average_stated_protein = records.iter().map(|r| r.stated_protein).sum::<f64>() / count;
    let average_quality_adjusted_protein =
        records.iter().map(|r| r.digestible_protein).sum::<f64>() / count;

    let mut usage: HashMap<&str, usize> = HashMap::new();
    for record in records {
        *usage.entry(record.protein_source.name.as_str()).or_default() += 1;
    }
    let mut most_used_sources: Vec<(String, usize)> = usage
        .into_iter()
        .map(|(name, uses)| (name.to_string(), uses))
        .collect();
    most_used_sources.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    most_used_sources.truncate(MOST_USED_SOURCES);

    CalculationStatistics {
        total_calculations,
        average_stated_protein,
        average_quality_adjusted_protein,
        most_used_sources,
    }
}
