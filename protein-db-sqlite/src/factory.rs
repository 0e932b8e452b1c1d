use async_trait::async_trait;
use protein_core::db::{DbConfig, HistoryStore, HistoryStoreFactory, RepositoryError};

use crate::repository::SqliteHistoryStore;

/// [`HistoryStoreFactory`] for SQLite.
///
/// Register this with a [`protein_core::db::HistoryStoreRegistry`] to make
/// the `"sqlite"` backend available:
///
/// ```rust,no_run
/// use protein_core::db::HistoryStoreRegistry;
/// use protein_db_sqlite::SqliteHistoryStoreFactory;
///
/// let mut registry = HistoryStoreRegistry::new();
/// registry.register(Box::new(SqliteHistoryStoreFactory));
/// ```
pub struct SqliteHistoryStoreFactory;

#[async_trait]
impl HistoryStoreFactory for SqliteHistoryStoreFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Open the database described by `config.connection_string` and bring
    /// its schema up to date.
    ///
    /// Accepted connection-string values:
    /// * A bare file path, e.g. `"protein_history.db"`. Created if missing.
    /// * A sqlx URL, e.g. `"sqlite:protein_history.db?mode=rwc"`.
    /// * `":memory:"`, an ephemeral database.
    async fn create(&self, config: &DbConfig) -> Result<Box<dyn HistoryStore>, RepositoryError> {
        let store = SqliteHistoryStore::connect(&config.connection_string).await?;
        store.run_migrations().await?;
        Ok(Box::new(store))
    }
}
