mod loader;

pub use loader::{CatalogLoader, CatalogLoaderError, default_catalog, load_catalog};
