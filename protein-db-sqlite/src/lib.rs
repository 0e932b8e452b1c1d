mod columns;
pub mod factory;
pub mod repository;

pub use factory::SqliteHistoryStoreFactory;
pub use repository::SqliteHistoryStore;
