pub mod calculations;
pub mod catalog;
pub mod db;
pub mod history;
pub mod models;

pub use catalog::{CatalogError, ProteinCatalog};
pub use db::{DbConfig, HistoryStore, HistoryStoreRegistry, RepositoryError};
pub use history::{HistoryTransferError, ImportSummary, MAX_HISTORY_RECORDS};
pub use models::*;
