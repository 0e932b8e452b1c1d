//! Runtime settings.
//!
//! Each setting is taken from the first place that provides it:
//!
//! | Source         | Example                                        |
//! |----------------|------------------------------------------------|
//! | command line   | `--backend memory`                             |
//! | environment    | `PROTEIN_CHECKER_BACKEND=memory`               |
//! | config file    | `[database] backend = "memory"`                |
//! | default        | `sqlite`, `protein_history.db`, built-in catalog, `info` |
//!
//! The config file is `--config`, else `PROTEIN_CHECKER_CONFIG`, else
//! `./protein-checker.toml` if it exists. Every key in it is optional:
//!
//! ```toml
//! [database]
//! backend = "sqlite"
//! connection_string = "protein_history.db"
//!
//! [catalog]
//! path = "my_sources.csv"
//!
//! [logging]
//! level = "info"
//! file = "protein-checker.log"
//! ```

use std::path::{Path, PathBuf};

use protein_core::DbConfig;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub const ENV_CONFIG: &str = "PROTEIN_CHECKER_CONFIG";
pub const ENV_BACKEND: &str = "PROTEIN_CHECKER_BACKEND";
pub const ENV_DB: &str = "PROTEIN_CHECKER_DB";
pub const ENV_CATALOG: &str = "PROTEIN_CHECKER_CATALOG";

pub const DEFAULT_CONFIG_FILE: &str = "protein-checker.toml";
pub const DEFAULT_BACKEND: &str = "sqlite";
pub const DEFAULT_DB: &str = "protein_history.db";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub database: DatabaseSection,
    pub catalog: CatalogSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseSection {
    pub backend: Option<String>,
    pub connection_string: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogSection {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    pub level: Option<String>,
    pub file: Option<PathBuf>,
}

impl FileConfig {
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }
}

/// Values given on the command line. `None` means "not given".
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub backend: Option<String>,
    pub db: Option<String>,
    pub catalog: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub db: DbConfig,
    /// `None` selects the built-in catalog.
    pub catalog_path: Option<PathBuf>,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Settings {
    /// Resolves settings against the process environment.
    pub fn resolve(overrides: Overrides) -> Result<Self, ConfigError> {
        Self::resolve_with_env(overrides, |key| std::env::var(key).ok())
    }

    /// Resolves settings with `env` standing in for the process environment.
    pub fn resolve_with_env<F>(overrides: Overrides, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        let config_path = overrides
            .config
            .clone()
            .or_else(|| env(ENV_CONFIG).map(PathBuf::from))
            .or_else(|| {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default.is_file().then_some(default)
            });

        let file = match &config_path {
            Some(path) => {
                debug!(path = %path.display(), "loading config file");
                FileConfig::load(path)?
            }
            None => FileConfig::default(),
        };

        let backend = overrides
            .backend
            .or_else(|| env(ENV_BACKEND))
            .or(file.database.backend)
            .unwrap_or_else(|| DEFAULT_BACKEND.to_string());

        let connection_string = overrides
            .db
            .or_else(|| env(ENV_DB))
            .or(file.database.connection_string)
            .unwrap_or_else(|| DEFAULT_DB.to_string());

        let catalog_path = overrides
            .catalog
            .or_else(|| env(ENV_CATALOG).map(PathBuf::from))
            .or(file.catalog.path);

        let log_level = overrides
            .log_level
            .or(file.logging.level)
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        let log_file = overrides.log_file.or(file.logging.file);

        Ok(Self {
            db: DbConfig {
                backend: backend.trim().to_lowercase(),
                connection_string,
            },
            catalog_path,
            log_level,
            log_file,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write_config(dir: &tempfile::TempDir, text: &str) -> PathBuf {
        let path = dir.path().join("protein-checker.toml");
        std::fs::write(&path, text).expect("write config");
        path
    }

    #[test]
    fn parses_full_config() {
        let text = r#"
            [database]
            backend = "memory"
            connection_string = "ignored"

            [catalog]
            path = "my_sources.csv"

            [logging]
            level = "debug"
            file = "checker.log"
        "#;

        let config = FileConfig::parse(text, Path::new("test.toml")).unwrap();

        assert_eq!(config.database.backend.as_deref(), Some("memory"));
        assert_eq!(config.catalog.path, Some(PathBuf::from("my_sources.csv")));
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        assert_eq!(config.logging.file, Some(PathBuf::from("checker.log")));
    }

    #[test]
    fn empty_config_is_default() {
        assert_eq!(
            FileConfig::parse("", Path::new("empty.toml")).unwrap(),
            FileConfig::default()
        );
    }

    #[test]
    fn unknown_key_is_rejected() {
        let result = FileConfig::parse("[database]\nbackedn = \"sqlite\"\n", Path::new("typo.toml"));

        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn missing_explicit_config_is_read_error() {
        let overrides = Overrides {
            config: Some(PathBuf::from("/no/such/protein-checker.toml")),
            ..Overrides::default()
        };

        let result = Settings::resolve_with_env(overrides, no_env);

        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn file_values_apply_when_nothing_else_is_set() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = write_config(
            &dir,
            "[database]\nbackend = \"Memory\"\n[logging]\nlevel = \"warn\"\n",
        );
        let overrides = Overrides {
            config: Some(path),
            ..Overrides::default()
        };

        let settings = Settings::resolve_with_env(overrides, no_env).unwrap();

        assert_eq!(settings.db.backend, "memory");
        assert_eq!(settings.db.connection_string, DEFAULT_DB);
        assert_eq!(settings.log_level, "warn");
        assert_eq!(settings.catalog_path, None);
    }

    #[test]
    fn environment_beats_file_and_flags_beat_environment() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = write_config(
            &dir,
            "[database]\nbackend = \"sqlite\"\nconnection_string = \"file.db\"\n[catalog]\npath = \"file.csv\"\n",
        );
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_BACKEND, "memory"),
            (ENV_DB, "env.db"),
            (ENV_CATALOG, "env.csv"),
        ]);
        let overrides = Overrides {
            config: Some(path),
            db: Some("flag.db".to_string()),
            ..Overrides::default()
        };

        let settings =
            Settings::resolve_with_env(overrides, |key| env.get(key).map(|v| v.to_string()))
                .unwrap();

        assert_eq!(settings.db.backend, "memory");
        assert_eq!(settings.db.connection_string, "flag.db");
        assert_eq!(settings.catalog_path, Some(PathBuf::from("env.csv")));
    }

    #[test]
    fn config_path_from_environment() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = write_config(&dir, "[logging]\nfile = \"from-env.log\"\n");
        let path_text = path.display().to_string();

        let settings = Settings::resolve_with_env(Overrides::default(), |key| {
            (key == ENV_CONFIG).then(|| path_text.clone())
        })
        .unwrap();

        assert_eq!(settings.log_file, Some(PathBuf::from("from-env.log")));
    }

    #[test]
    fn blank_environment_values_are_ignored() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let overrides = Overrides {
            config: Some(write_config(&dir, "")),
            ..Overrides::default()
        };

        let settings =
            Settings::resolve_with_env(overrides, |key| (key == ENV_BACKEND).then(|| "  ".to_string()))
                .unwrap();

        assert_eq!(settings.db.backend, DEFAULT_BACKEND);
    }
}
