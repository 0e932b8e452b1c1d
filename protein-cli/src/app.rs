//! Command handlers.
//!
//! Each handler takes the catalog and/or history store it needs and returns
//! the text to print, so the binary only parses arguments and writes output.

use std::cmp::Ordering;
use std::fmt::Write as _;

use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use protein_core::calculations::{
    calculate_digestible_protein, compare_protein_quality, create_calculation_record,
    get_protein_quality_rating, parse_calculation_input,
};
use protein_core::db::MemoryHistoryStoreFactory;
use protein_core::{
    CalculationRecord, HistoryStore, HistoryStoreRegistry, ProteinCatalog, ProteinCategory,
    ProteinSource, RepositoryError,
};
use protein_db_sqlite::SqliteHistoryStoreFactory;
use tracing::{debug, info};

use crate::utils::{format_percentage, format_protein_amount, format_quality_percentage, format_score};

pub const DEFAULT_TOP_LIMIT: usize = 10;

/// Registry with every backend this binary ships.
pub fn build_registry() -> HistoryStoreRegistry {
    let mut registry = HistoryStoreRegistry::new();
    registry.register(Box::new(SqliteHistoryStoreFactory));
    registry.register(Box::new(MemoryHistoryStoreFactory));
    registry
}

fn resolve_source<'a>(catalog: &'a ProteinCatalog, key: &str) -> Result<&'a ProteinSource> {
    catalog
        .resolve(key)
        .ok_or_else(|| anyhow!("unknown protein source '{key}' (try `sources --search`)"))
}

fn parse_category(category: &str) -> Result<ProteinCategory> {
    ProteinCategory::parse(category).ok_or_else(|| {
        let known: Vec<_> = ProteinCategory::ALL.iter().map(|c| c.as_str()).collect();
        anyhow!("unknown category '{category}'; expected one of {}", known.join(", "))
    })
}

fn score_label(source: &ProteinSource) -> String {
    match (source.diaas_score, source.pdcaas_score) {
        (None, None) => "no score".to_string(),
        (diaas, pdcaas) => format!("DIAAS {} / PDCAAS {}", format_score(diaas), format_score(pdcaas)),
    }
}

// ─── calculate ───────────────────────────────────────────────────────────────

/// Arguments of the `calculate` command, as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct CalculateRequest {
    pub protein: String,
    pub dv: Option<String>,
    pub source: String,
    pub save: bool,
}

pub async fn calculate(
    catalog: &ProteinCatalog,
    store: &dyn HistoryStore,
    request: &CalculateRequest,
) -> Result<String> {
    let source = resolve_source(catalog, &request.source)?;
    let input = parse_calculation_input(
        &request.protein,
        request.dv.as_deref().unwrap_or(""),
        Some(source),
    )?;
    let result = calculate_digestible_protein(&input);

    let mut out = String::new();
    writeln!(out, "Source:            {} ({})", source.name, source.category.display_name())?;
    writeln!(out, "Stated protein:    {}", format_protein_amount(input.stated_protein))?;
    if let (Some(dv), Some(adjusted)) = (input.dv_percentage, result.adjusted_protein) {
        writeln!(
            out,
            "From {} DV:     {}",
            format_percentage(dv),
            format_protein_amount(adjusted)
        )?;
    }
    writeln!(
        out,
        "Quality score:     {:.2} ({})",
        result.score_used, result.calculation_method
    )?;
    writeln!(
        out,
        "Quality-adjusted:  {}",
        format_protein_amount(result.quality_adjusted_protein)
    )?;
    write!(
        out,
        "Protein quality:   {}",
        format_quality_percentage(result.protein_quality_percentage)
    )?;
    if let Some(discrepancy) = result.dv_discrepancy {
        write!(
            out,
            "\nWarning: the label's DV% differs from the stated protein by {}",
            format_protein_amount(discrepancy)
        )?;
    }

    if request.save {
        let record = create_calculation_record(&input, &result);
        let id = record.id.clone();
        store.append(record).await.context("Failed to save calculation")?;
        debug!(%id, "saved calculation");
        write!(out, "\nSaved as {id}")?;
    }

    Ok(out)
}

// ─── catalog ─────────────────────────────────────────────────────────────────

pub fn list_sources(
    catalog: &ProteinCatalog,
    category: Option<&str>,
    search: Option<&str>,
) -> Result<String> {
    let category = category.map(parse_category).transpose()?.unwrap_or(ProteinCategory::All);
    let sources = catalog.search(search.unwrap_or(""), category);

    if sources.is_empty() {
        return Ok("No matching protein sources.".to_string());
    }

    let mut out = String::new();
    for source in &sources {
        writeln!(
            out,
            "{:<26} {:<28} {:<11} {}",
            source.id,
            source.name,
            source.category.as_str(),
            score_label(source)
        )?;
    }
    write!(out, "{} sources", sources.len())?;
    Ok(out)
}

pub fn top_sources(catalog: &ProteinCatalog, limit: usize) -> Result<String> {
    let mut out = String::new();
    for (rank, source) in catalog.highest_quality(limit).into_iter().enumerate() {
        let rating = get_protein_quality_rating(source);
        writeln!(
            out,
            "{:>2}. {:<28} {:<11} {}",
            rank + 1,
            source.name,
            rating.rating.label(),
            score_label(source)
        )?;
    }
    Ok(out.trim_end().to_string())
}

pub fn rating(catalog: &ProteinCatalog, key: &str) -> Result<String> {
    let source = resolve_source(catalog, key)?;
    let rating = get_protein_quality_rating(source);
    Ok(format!(
        "{}: {} ({}) - {}",
        source.name,
        rating.rating,
        rating.rating.hex_color(),
        rating.description
    ))
}

pub fn compare(catalog: &ProteinCatalog, first: &str, second: &str) -> Result<String> {
    let a = resolve_source(catalog, first)?;
    let b = resolve_source(catalog, second)?;

    Ok(match compare_protein_quality(a, b) {
        Ordering::Greater => format!("{} has higher protein quality than {}", a.name, b.name),
        Ordering::Less => format!("{} has higher protein quality than {}", b.name, a.name),
        Ordering::Equal => format!("{} and {} have equal protein quality", a.name, b.name),
    })
}

// ─── history ─────────────────────────────────────────────────────────────────

/// Accepts RFC 3339 or a bare `YYYY-MM-DD` date. A bare date means the start
/// of that day, or its end when `end_of_day` is set.
pub fn parse_timestamp(text: &str, end_of_day: bool) -> Result<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Ok(timestamp.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{text}', expected RFC 3339 or YYYY-MM-DD"))?;
    let time = if end_of_day {
        NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999)
    } else {
        NaiveTime::from_hms_opt(0, 0, 0)
    }
    .ok_or_else(|| anyhow!("invalid time of day"))?;
    Ok(Utc.from_utc_datetime(&date.and_time(time)))
}

fn latest_timestamp() -> Result<DateTime<Utc>> {
    Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59)
        .single()
        .ok_or_else(|| anyhow!("invalid upper date bound"))
}

fn format_record(record: &CalculationRecord) -> String {
    format!(
        "{}  {}  {:<26} {:>7} -> {:>7} {:>7} {}",
        record.timestamp.format("%Y-%m-%d %H:%M"),
        record.id,
        record.protein_source.name,
        format_protein_amount(record.stated_protein),
        format_protein_amount(record.digestible_protein),
        format_percentage(record.digestibility_percentage),
        record.calculation_method
    )
}

/// Filters for `history list`.
#[derive(Debug, Clone, Default)]
pub struct HistoryFilter {
    pub source: Option<String>,
    pub since: Option<String>,
    pub until: Option<String>,
    /// Source category, `all` included.
    pub category: Option<String>,
    /// Case-insensitive text matched against the source name.
    pub search: Option<String>,
}

pub async fn history_list(store: &dyn HistoryStore, filter: &HistoryFilter) -> Result<String> {
    let category = filter
        .category
        .as_deref()
        .map(parse_category)
        .transpose()?
        .unwrap_or(ProteinCategory::All);
    let search = filter
        .search
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_default();

    let records = if filter.since.is_some() || filter.until.is_some() {
        let start = match &filter.since {
            Some(since) => parse_timestamp(since, false)?,
            None => DateTime::<Utc>::UNIX_EPOCH,
        };
        let end = match &filter.until {
            Some(until) => parse_timestamp(until, true)?,
            None => latest_timestamp()?,
        };
        let in_range = store.list_between(start, end).await?;
        match &filter.source {
            Some(source) => in_range
                .into_iter()
                .filter(|r| &r.protein_source.id == source)
                .collect(),
            None => in_range,
        }
    } else {
        match &filter.source {
            Some(source) => store.list_for_source(source).await?,
            None => store.list().await?,
        }
    };
    let records: Vec<_> = records
        .into_iter()
        .filter(|r| category.matches(r.protein_source.category))
        .filter(|r| search.is_empty() || r.protein_source.name.to_lowercase().contains(&search))
        .collect();

    if records.is_empty() {
        return Ok("No calculations recorded.".to_string());
    }
    Ok(records.iter().map(format_record).collect::<Vec<_>>().join("\n"))
}

pub async fn history_delete(store: &dyn HistoryStore, id: &str) -> Result<String> {
    match store.delete_by_id(id).await {
        Ok(()) => Ok(format!("Deleted {id}")),
        Err(RepositoryError::NotFound) => bail!("no calculation with id '{id}'"),
        Err(e) => Err(e.into()),
    }
}

pub async fn history_clear(store: &dyn HistoryStore) -> Result<String> {
    store.clear().await?;
    Ok("History cleared.".to_string())
}

pub async fn history_stats(store: &dyn HistoryStore) -> Result<String> {
    let stats = store.statistics().await?;

    let mut out = String::new();
    writeln!(out, "Calculations:              {}", stats.total_calculations)?;
    writeln!(
        out,
        "Average stated protein:    {}",
        format_protein_amount(stats.average_stated_protein)
    )?;
    write!(
        out,
        "Average quality-adjusted:  {}",
        format_protein_amount(stats.average_quality_adjusted_protein)
    )?;
    if !stats.most_used_sources.is_empty() {
        write!(out, "\nMost used sources:")?;
        for (name, count) in &stats.most_used_sources {
            write!(out, "\n  {name} ({count})")?;
        }
    }
    Ok(out)
}

// ─── transfer ────────────────────────────────────────────────────────────────

pub async fn export(store: &dyn HistoryStore) -> Result<String> {
    Ok(store.export_all().await?)
}

pub async fn import(store: &dyn HistoryStore, json: &str, replace_existing: bool) -> Result<String> {
    let summary = store
        .import_merge(json, replace_existing)
        .await
        .context("Failed to import history")?;
    info!(total = summary.total, "history import finished");

    let mut out = format!(
        "Imported {} calculations ({} duplicates skipped",
        summary.imported, summary.skipped_duplicates
    );
    if summary.dropped_over_cap > 0 {
        write!(out, ", {} oldest dropped", summary.dropped_over_cap)?;
    }
    write!(out, "). History now holds {}.", summary.total)?;
    Ok(out)
}
