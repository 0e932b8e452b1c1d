use chrono::{DateTime, SecondsFormat, Utc};
use protein_core::RepositoryError;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, TypeInfo, ValueRef};

/// Get a float from a row, accepting both INTEGER and REAL storage classes.
pub fn get_f64(row: &SqliteRow, column: &str) -> Result<f64, RepositoryError> {
    let value_ref = row
        .try_get_raw(column)
        .map_err(|e| RepositoryError::Database(format!("Column '{}' not found: {}", column, e)))?;

    if value_ref.is_null() {
        return Err(RepositoryError::Database(format!(
            "Unexpected NULL in column '{}'",
            column
        )));
    }

    let type_info = value_ref.type_info();
    let type_name = type_info.name();

    match type_name {
        "INTEGER" => {
            let val: i64 = row.try_get(column).map_err(|e| {
                RepositoryError::Database(format!(
                    "Failed to get INTEGER from '{}': {}",
                    column, e
                ))
            })?;
            Ok(val as f64)
        }
        "REAL" => row.try_get(column).map_err(|e| {
            RepositoryError::Database(format!("Failed to get REAL from '{}': {}", column, e))
        }),
        _ => Err(RepositoryError::Database(format!(
            "Unexpected type '{}' for column '{}'",
            type_name, column
        ))),
    }
}

/// Like [`get_f64`], returning `None` for NULL.
pub fn get_optional_f64(row: &SqliteRow, column: &str) -> Result<Option<f64>, RepositoryError> {
    let value_ref = row
        .try_get_raw(column)
        .map_err(|e| RepositoryError::Database(format!("Column '{}' not found: {}", column, e)))?;

    if value_ref.is_null() {
        return Ok(None);
    }

    get_f64(row, column).map(Some)
}

pub fn get_string(row: &SqliteRow, column: &str) -> Result<String, RepositoryError> {
    row.try_get(column)
        .map_err(|e| RepositoryError::Database(format!("Failed to get '{}': {}", column, e)))
}

pub fn get_optional_string(
    row: &SqliteRow,
    column: &str,
) -> Result<Option<String>, RepositoryError> {
    row.try_get(column)
        .map_err(|e| RepositoryError::Database(format!("Failed to get '{}': {}", column, e)))
}

/// Fixed-width UTC text, so lexical order matches chronological order.
pub fn timestamp_to_text(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn get_timestamp(row: &SqliteRow, column: &str) -> Result<DateTime<Utc>, RepositoryError> {
    let text = get_string(row, column)?;
    DateTime::parse_from_rfc3339(&text)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| {
            RepositoryError::Database(format!("Invalid timestamp '{}' in '{}': {}", text, column, e))
        })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

    use super::*;

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");
        sqlx::query(
            "CREATE TABLE test_values (
                id INTEGER PRIMARY KEY,
                untyped_value,
                real_value REAL,
                text_value TEXT
            )",
        )
        .execute(&pool)
        .await
        .expect("Failed to create test table");
        pool
    }

    async fn fetch(pool: &SqlitePool, sql: &str) -> SqliteRow {
        sqlx::query(sql)
            .fetch_one(pool)
            .await
            .expect("Failed to fetch row")
    }

    #[tokio::test]
    async fn test_get_f64_from_integer() {
        let pool = setup_test_db().await;
        sqlx::query("INSERT INTO test_values (id, untyped_value) VALUES (1, 42)")
            .execute(&pool)
            .await
            .expect("Failed to insert test data");

        let row = fetch(&pool, "SELECT untyped_value FROM test_values WHERE id = 1").await;

        assert_eq!(get_f64(&row, "untyped_value"), Ok(42.0));
    }

    #[tokio::test]
    async fn test_get_f64_from_real() {
        let pool = setup_test_db().await;
        sqlx::query("INSERT INTO test_values (id, real_value) VALUES (1, 0.5)")
            .execute(&pool)
            .await
            .expect("Failed to insert test data");

        let row = fetch(&pool, "SELECT real_value FROM test_values WHERE id = 1").await;

        assert_eq!(get_f64(&row, "real_value"), Ok(0.5));
    }

    #[tokio::test]
    async fn test_get_f64_rejects_text_and_null() {
        let pool = setup_test_db().await;
        sqlx::query("INSERT INTO test_values (id, text_value) VALUES (1, 'abc')")
            .execute(&pool)
            .await
            .expect("Failed to insert test data");

        let row = fetch(&pool, "SELECT text_value, real_value FROM test_values WHERE id = 1").await;

        assert!(matches!(get_f64(&row, "text_value"), Err(RepositoryError::Database(_))));
        assert!(matches!(get_f64(&row, "real_value"), Err(RepositoryError::Database(_))));
    }

    #[tokio::test]
    async fn test_get_optional_f64() {
        let pool = setup_test_db().await;
        sqlx::query("INSERT INTO test_values (id, real_value) VALUES (1, NULL), (2, 1.25)")
            .execute(&pool)
            .await
            .expect("Failed to insert test data");

        let null_row = fetch(&pool, "SELECT real_value FROM test_values WHERE id = 1").await;
        let value_row = fetch(&pool, "SELECT real_value FROM test_values WHERE id = 2").await;

        assert_eq!(get_optional_f64(&null_row, "real_value"), Ok(None));
        assert_eq!(get_optional_f64(&value_row, "real_value"), Ok(Some(1.25)));
    }

    #[tokio::test]
    async fn test_missing_column_is_database_error() {
        let pool = setup_test_db().await;
        sqlx::query("INSERT INTO test_values (id) VALUES (1)")
            .execute(&pool)
            .await
            .expect("Failed to insert test data");

        let row = fetch(&pool, "SELECT id FROM test_values WHERE id = 1").await;

        assert!(matches!(get_f64(&row, "nope"), Err(RepositoryError::Database(_))));
    }

    #[test]
    fn timestamp_text_is_fixed_width() {
        let whole = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let fractional = whole + chrono::Duration::nanoseconds(1_500);

        assert_eq!(timestamp_to_text(whole), "2025-01-01T00:00:00.000000000Z");
        assert_eq!(timestamp_to_text(fractional), "2025-01-01T00:00:00.000001500Z");
        assert!(timestamp_to_text(whole) < timestamp_to_text(fractional));
    }
}
