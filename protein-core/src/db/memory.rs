//! In-process history backend. Nothing survives the process.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::debug;

use super::factory::{DbConfig, HistoryStoreFactory};
use super::repository::{HistoryStore, RepositoryError};
use crate::history::{MAX_HISTORY_RECORDS, sort_newest_first};
use crate::models::CalculationRecord;

/// History kept in a vector, newest first.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    records: Mutex<Vec<CalculationRecord>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> Result<MutexGuard<'_, Vec<CalculationRecord>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|e| RepositoryError::Database(format!("history lock poisoned: {e}")))
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn append(&self, record: CalculationRecord) -> Result<(), RepositoryError> {
        let mut records = self.records()?;
        if records.iter().any(|r| r.id == record.id) {
            return Err(RepositoryError::AlreadyExists(record.id));
        }

        // Ahead of everything not strictly newer, so ties list latest-stored first.
        let position = records.partition_point(|r| r.timestamp > record.timestamp);
        debug!(id = %record.id, position, "appending calculation record");
        records.insert(position, record);
        records.truncate(MAX_HISTORY_RECORDS);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<CalculationRecord, RepositoryError> {
        self.records()?
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn list(&self) -> Result<Vec<CalculationRecord>, RepositoryError> {
        Ok(self.records()?.clone())
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), RepositoryError> {
        let mut records = self.records()?;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn clear(&self) -> Result<(), RepositoryError> {
        self.records()?.clear();
        Ok(())
    }

    async fn replace_all(&self, mut records: Vec<CalculationRecord>) -> Result<(), RepositoryError> {
        sort_newest_first(&mut records);
        records.truncate(MAX_HISTORY_RECORDS);
        *self.records()? = records;
        Ok(())
    }
}

/// [`HistoryStoreFactory`] for the `"memory"` backend.
pub struct MemoryHistoryStoreFactory;

#[async_trait]
impl HistoryStoreFactory for MemoryHistoryStoreFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(&self, _config: &DbConfig) -> Result<Box<dyn HistoryStore>, RepositoryError> {
        Ok(Box::new(MemoryHistoryStore::new()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{CalculationMethod, ProteinCategory, ProteinSource};

    fn record(id: &str, minutes: i64, source_id: &str) -> CalculationRecord {
        CalculationRecord {
            id: id.to_string(),
            stated_protein: 20.0,
            dv_percentage: None,
            protein_source: ProteinSource {
                id: source_id.to_string(),
                name: source_id.to_uppercase(),
                category: ProteinCategory::Plant,
                diaas_score: Some(0.5),
                pdcaas_score: None,
                description: None,
            },
            digestible_protein: 10.0,
            digestibility_percentage: 50.0,
            calculation_method: CalculationMethod::Diaas,
            timestamp: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes),
        }
    }

    fn ids(records: &[CalculationRecord]) -> Vec<String> {
        records.iter().map(|r| r.id.clone()).collect()
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = MemoryHistoryStore::new();
        store.append(record("b", 2, "oats")).await.unwrap();
        store.append(record("a", 1, "oats")).await.unwrap();
        store.append(record("c", 3, "oats")).await.unwrap();

        assert_eq!(ids(&store.list().await.unwrap()), vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn equal_timestamps_list_latest_stored_first() {
        let store = MemoryHistoryStore::new();
        store.append(record("first", 1, "oats")).await.unwrap();
        store.append(record("second", 1, "oats")).await.unwrap();

        assert_eq!(ids(&store.list().await.unwrap()), vec!["second", "first"]);
    }

    #[tokio::test]
    async fn append_rejects_duplicate_id() {
        let store = MemoryHistoryStore::new();
        store.append(record("a", 1, "oats")).await.unwrap();

        let result = store.append(record("a", 2, "oats")).await;

        assert_eq!(result, Err(RepositoryError::AlreadyExists("a".to_string())));
    }

    #[tokio::test]
    async fn append_drops_oldest_beyond_cap() {
        let store = MemoryHistoryStore::new();
        for i in 0..(MAX_HISTORY_RECORDS as i64 + 5) {
            store.append(record(&format!("r{i}"), i, "oats")).await.unwrap();
        }

        let records = store.list().await.unwrap();
        assert_eq!(records.len(), MAX_HISTORY_RECORDS);
        assert_eq!(records.first().map(|r| r.id.as_str()), Some("r104"));
        assert_eq!(records.last().map(|r| r.id.as_str()), Some("r5"));
    }

    #[tokio::test]
    async fn get_and_delete() {
        let store = MemoryHistoryStore::new();
        store.append(record("a", 1, "oats")).await.unwrap();

        assert_eq!(store.get("a").await.unwrap().id, "a");
        store.delete_by_id("a").await.unwrap();
        assert_eq!(store.get("a").await, Err(RepositoryError::NotFound));
        assert_eq!(store.delete_by_id("a").await, Err(RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn clear_removes_everything() {
        let store = MemoryHistoryStore::new();
        store.append(record("a", 1, "oats")).await.unwrap();
        store.append(record("b", 2, "tofu")).await.unwrap();

        store.clear().await.unwrap();

        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn filters_by_source_and_time() {
        let store = MemoryHistoryStore::new();
        store.append(record("a", 1, "oats")).await.unwrap();
        store.append(record("b", 5, "tofu")).await.unwrap();
        store.append(record("c", 10, "oats")).await.unwrap();

        let oats = store.list_for_source("oats").await.unwrap();
        assert_eq!(ids(&oats), vec!["c", "a"]);

        let start = record("x", 1, "oats").timestamp;
        let end = record("x", 5, "oats").timestamp;
        let window = store.list_between(start, end).await.unwrap();
        assert_eq!(ids(&window), vec!["b", "a"]);
    }

    #[tokio::test]
    async fn factory_creates_empty_store() {
        let factory = MemoryHistoryStoreFactory;
        assert_eq!(factory.backend_name(), "memory");

        let store = factory.create(&DbConfig::new("memory", "")).await.unwrap();

        assert!(store.list().await.unwrap().is_empty());
    }
}
