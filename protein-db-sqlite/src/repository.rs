use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use protein_core::history::{MAX_HISTORY_RECORDS, cap_history};
use protein_core::{
    CalculationMethod, CalculationRecord, HistoryStore, ProteinCategory, ProteinSource,
    RepositoryError,
};
use sqlx::query::Query;
use sqlx::sqlite::{
    SqliteArguments, SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::{Executor, Sqlite};
use tracing::{debug, info};

use crate::columns::{
    get_f64, get_optional_f64, get_optional_string, get_string, get_timestamp, timestamp_to_text,
};

const SELECT_RECORD: &str = "SELECT id, stated_protein, dv_percentage,
        source_id, source_name, source_category, source_diaas, source_pdcaas, source_description,
        digestible_protein, digestibility_percentage, calculation_method, timestamp
    FROM calculation_history";

const NEWEST_FIRST: &str = "ORDER BY timestamp DESC, seq DESC";

pub struct SqliteHistoryStore {
    pool: SqlitePool,
}

impl SqliteHistoryStore {
    /// Opens a store. Accepts `:memory:`, a `sqlite:` URL, or a bare file
    /// path (created if missing). Migrations are not run.
    pub async fn connect(connection_string: &str) -> Result<Self, RepositoryError> {
        let connection_string = connection_string.trim();
        let connected = if connection_string == ":memory:" {
            // Every connection to :memory: is a separate database.
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(parse_options("sqlite::memory:")?)
                .await
        } else if connection_string.starts_with("sqlite:") {
            SqlitePool::connect_with(parse_options(connection_string)?).await
        } else {
            let options = SqliteConnectOptions::new()
                .filename(connection_string)
                .create_if_missing(true);
            SqlitePool::connect_with(options).await
        };

        let pool = connected.map_err(|e| {
            RepositoryError::Connection(format!(
                "Failed to connect to database '{}': {}",
                connection_string, e
            ))
        })?;

        debug!(connection_string, "opened sqlite history store");
        Ok(Self { pool })
    }

    /// Wraps an existing pool. Migrations are not run.
    pub fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<(), RepositoryError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(format!("Failed to run migrations: {}", e)))?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn fetch_records<'q>(
        &self,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> Result<Vec<CalculationRecord>, RepositoryError> {
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;
        rows.iter().map(row_to_record).collect()
    }
}

fn parse_options(url: &str) -> Result<SqliteConnectOptions, RepositoryError> {
    SqliteConnectOptions::from_str(url)
        .map_err(|e| RepositoryError::Configuration(format!("Invalid SQLite URL '{}': {}", url, e)))
}

fn row_to_record(row: &SqliteRow) -> Result<CalculationRecord, RepositoryError> {
    let category = get_string(row, "source_category")?;
    let method = get_string(row, "calculation_method")?;

    Ok(CalculationRecord {
        id: get_string(row, "id")?,
        stated_protein: get_f64(row, "stated_protein")?,
        dv_percentage: get_optional_f64(row, "dv_percentage")?,
        protein_source: ProteinSource {
            id: get_string(row, "source_id")?,
            name: get_string(row, "source_name")?,
            category: ProteinCategory::parse(&category).ok_or_else(|| {
                RepositoryError::Database(format!("Unknown protein category '{}'", category))
            })?,
            diaas_score: get_optional_f64(row, "source_diaas")?,
            pdcaas_score: get_optional_f64(row, "source_pdcaas")?,
            description: get_optional_string(row, "source_description")?,
        },
        digestible_protein: get_f64(row, "digestible_protein")?,
        digestibility_percentage: get_f64(row, "digestibility_percentage")?,
        calculation_method: CalculationMethod::parse(&method).ok_or_else(|| {
            RepositoryError::Database(format!("Unknown calculation method '{}'", method))
        })?,
        timestamp: get_timestamp(row, "timestamp")?,
    })
}

async fn insert_record<'e, E>(executor: E, record: &CalculationRecord) -> Result<(), RepositoryError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let source = &record.protein_source;
    sqlx::query(
        "INSERT INTO calculation_history (
            id, stated_protein, dv_percentage,
            source_id, source_name, source_category, source_diaas, source_pdcaas, source_description,
            digestible_protein, digestibility_percentage, calculation_method, timestamp
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&record.id)
    .bind(record.stated_protein)
    .bind(record.dv_percentage)
    .bind(&source.id)
    .bind(&source.name)
    .bind(source.category.as_str())
    .bind(source.diaas_score)
    .bind(source.pdcaas_score)
    .bind(source.description.as_deref())
    .bind(record.digestible_protein)
    .bind(record.digestibility_percentage)
    .bind(record.calculation_method.as_str())
    .bind(timestamp_to_text(record.timestamp))
    .execute(executor)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepositoryError::AlreadyExists(record.id.clone())
        }
        _ => RepositoryError::Database(e.to_string()),
    })?;
    Ok(())
}

#[async_trait]
impl HistoryStore for SqliteHistoryStore {
    async fn append(&self, record: CalculationRecord) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        insert_record(&mut *tx, &record).await?;

        let dropped = sqlx::query(
            "DELETE FROM calculation_history WHERE seq NOT IN (
                SELECT seq FROM calculation_history ORDER BY timestamp DESC, seq DESC LIMIT ?
            )",
        )
        .bind(MAX_HISTORY_RECORDS as i64)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?
        .rows_affected();

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        debug!(id = %record.id, dropped, "appended calculation record");
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<CalculationRecord, RepositoryError> {
        let row = sqlx::query(&format!("{SELECT_RECORD} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?
            .ok_or(RepositoryError::NotFound)?;

        row_to_record(&row)
    }

    async fn list(&self) -> Result<Vec<CalculationRecord>, RepositoryError> {
        let sql = format!("{SELECT_RECORD} {NEWEST_FIRST}");
        self.fetch_records(sqlx::query(&sql)).await
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM calculation_history WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn clear(&self) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM calculation_history")
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        info!(deleted = result.rows_affected(), "cleared calculation history");
        Ok(())
    }

    async fn replace_all(&self, mut records: Vec<CalculationRecord>) -> Result<(), RepositoryError> {
        cap_history(&mut records);

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        sqlx::query("DELETE FROM calculation_history")
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        // Oldest first, so later rows win timestamp ties in `list`.
        for record in records.iter().rev() {
            insert_record(&mut *tx, record).await?;
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        debug!(records = records.len(), "replaced calculation history");
        Ok(())
    }

    async fn list_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CalculationRecord>, RepositoryError> {
        let sql = format!("{SELECT_RECORD} WHERE timestamp >= ? AND timestamp <= ? {NEWEST_FIRST}");
        let query = sqlx::query(&sql)
            .bind(timestamp_to_text(start))
            .bind(timestamp_to_text(end));
        self.fetch_records(query).await
    }

    async fn list_for_source(
        &self,
        source_id: &str,
    ) -> Result<Vec<CalculationRecord>, RepositoryError> {
        let sql = format!("{SELECT_RECORD} WHERE source_id = ? {NEWEST_FIRST}");
        self.fetch_records(sqlx::query(&sql).bind(source_id)).await
    }
}
