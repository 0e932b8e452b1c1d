use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;

use crate::history::{
    HistoryTransferError, ImportSummary, calculation_statistics, decode_history, encode_history,
    merge_history,
};
use crate::models::{CalculationRecord, CalculationStatistics};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Record already exists: {0}")]
    AlreadyExists(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Persistence for calculation history.
///
/// Backends implement the primitive operations; querying, statistics and
/// JSON export/import are built on top of them and shared by every backend.
///
/// `list` returns records newest first by timestamp. Records with equal
/// timestamps come back most recently stored first.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Stores a new record, dropping the oldest records beyond
    /// [`MAX_HISTORY_RECORDS`](crate::history::MAX_HISTORY_RECORDS).
    async fn append(&self, record: CalculationRecord) -> Result<(), RepositoryError>;

    async fn get(&self, id: &str) -> Result<CalculationRecord, RepositoryError>;

    async fn list(&self) -> Result<Vec<CalculationRecord>, RepositoryError>;

    async fn delete_by_id(&self, id: &str) -> Result<(), RepositoryError>;

    async fn clear(&self) -> Result<(), RepositoryError>;

    /// Replaces the whole history with `records`, given newest first.
    async fn replace_all(&self, records: Vec<CalculationRecord>) -> Result<(), RepositoryError>;

    /// Records with `start <= timestamp <= end`, newest first.
    async fn list_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CalculationRecord>, RepositoryError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|r| r.timestamp >= start && r.timestamp <= end)
            .collect())
    }

    async fn list_for_source(
        &self,
        source_id: &str,
    ) -> Result<Vec<CalculationRecord>, RepositoryError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|r| r.protein_source.id == source_id)
            .collect())
    }

    async fn statistics(&self) -> Result<CalculationStatistics, RepositoryError> {
        Ok(calculation_statistics(&self.list().await?))
    }

    /// The whole history as a pretty-printed JSON array.
    async fn export_all(&self) -> Result<String, HistoryTransferError> {
        let records = self.list().await?;
        let json = encode_history(&records)?;
        info!(records = records.len(), "exported calculation history");
        Ok(json)
    }

    /// Imports a JSON export, merging by id or replacing the history.
    async fn import_merge(
        &self,
        json: &str,
        replace_existing: bool,
    ) -> Result<ImportSummary, HistoryTransferError> {
        let imported = decode_history(json)?;
        let existing = if replace_existing {
            Vec::new()
        } else {
            self.list().await?
        };

        let (merged, summary) = merge_history(existing, imported, replace_existing);
        self.replace_all(merged).await?;

        info!(
            imported = summary.imported,
            skipped_duplicates = summary.skipped_duplicates,
            dropped_over_cap = summary.dropped_over_cap,
            total = summary.total,
            replace_existing,
            "imported calculation history"
        );
        Ok(summary)
    }
}
