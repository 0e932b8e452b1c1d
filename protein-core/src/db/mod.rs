pub mod factory;
pub mod memory;
pub mod repository;

pub use factory::{DbConfig, HistoryStoreFactory, HistoryStoreRegistry};
pub use memory::{MemoryHistoryStore, MemoryHistoryStoreFactory};
pub use repository::{HistoryStore, RepositoryError};
