use std::collections::BTreeMap;

use async_trait::async_trait;

use super::repository::{HistoryStore, RepositoryError};

/// Which history backend to open and how to reach it.
///
/// `connection_string` is only interpreted by the backend: a file path,
/// `:memory:` or a `sqlite:` URL for `sqlite`, nothing for `memory`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub backend: String,
    pub connection_string: String,
}

impl DbConfig {
    pub fn new(backend: impl Into<String>, connection_string: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            connection_string: connection_string.into(),
        }
    }
}

/// Opens one kind of [`HistoryStore`].
#[async_trait]
pub trait HistoryStoreFactory: Send + Sync {
    /// Lowercase name selected by [`DbConfig::backend`].
    fn backend_name(&self) -> &'static str;

    /// Returns a store ready for use, with any schema already in place.
    async fn create(&self, config: &DbConfig) -> Result<Box<dyn HistoryStore>, RepositoryError>;
}

/// History backends known to the binary, by name.
#[derive(Default)]
pub struct HistoryStoreRegistry {
    factories: BTreeMap<&'static str, Box<dyn HistoryStoreFactory>>,
}

impl HistoryStoreRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `factory`, replacing one registered under the same name.
    pub fn register(&mut self, factory: Box<dyn HistoryStoreFactory>) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Registered backend names in alphabetical order.
    pub fn available_backends(&self) -> Vec<&'static str> {
        self.factories.keys().copied().collect()
    }

    /// Opens the store named by `config.backend`.
    ///
    /// An unregistered name is a [`RepositoryError::Configuration`] listing
    /// the names that are registered.
    pub async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn HistoryStore>, RepositoryError> {
        match self.factories.get(config.backend.as_str()) {
            Some(factory) => factory.create(config).await,
            None => Err(RepositoryError::Configuration(format!(
                "unknown backend '{}'; available: {:?}",
                config.backend,
                self.available_backends()
            ))),
        }
    }
}
