use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;

use protein_cli::app::{self, CalculateRequest, DEFAULT_TOP_LIMIT, HistoryFilter};
use protein_cli::config::{DEFAULT_LOG_LEVEL, Overrides, Settings};
use protein_cli::logging;
use protein_core::HistoryStore;
use protein_data::load_catalog;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Protein quality checker.
///
/// Converts the protein printed on a food label into quality-adjusted protein
/// using DIAAS or PDCAAS scores, and keeps a history of calculations.
#[derive(Debug, Parser)]
#[command(name = "protein-checker", version)]
struct Cli {
    /// Config file (default: ./protein-checker.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// History backend: `sqlite` or `memory`.
    #[arg(long, global = true)]
    backend: Option<String>,

    /// History connection string.
    /// For SQLite this is a file path (e.g. `protein_history.db`), `:memory:`
    /// or a `sqlite:` URL.
    #[arg(long, global = true)]
    db: Option<String>,

    /// Protein source catalog CSV replacing the built-in one.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Log level or filter directive (e.g. `debug`, `protein_core=trace`).
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append logs to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Calculate quality-adjusted protein for one label.
    Calculate {
        /// Grams of protein stated on the label.
        #[arg(long)]
        protein: String,

        /// Daily Value percentage stated on the label.
        #[arg(long)]
        dv: Option<String>,

        /// Protein source id or name.
        #[arg(long)]
        source: String,

        /// Do not record the calculation in history.
        #[arg(long)]
        no_save: bool,
    },

    /// List protein sources.
    Sources {
        /// Category: all, meat, dairy, plant, supplement or other.
        #[arg(long)]
        category: Option<String>,

        /// Case-insensitive text matched against names and descriptions.
        #[arg(long)]
        search: Option<String>,
    },

    /// Show the highest quality protein sources.
    Top {
        #[arg(long, default_value_t = DEFAULT_TOP_LIMIT)]
        limit: usize,
    },

    /// Show the quality rating of a source.
    Rating {
        /// Protein source id or name.
        source: String,
    },

    /// Compare the quality of two sources.
    Compare { first: String, second: String },

    /// Inspect or edit calculation history.
    #[command(subcommand)]
    History(HistoryCommand),

    /// Write the calculation history as JSON.
    Export {
        /// Output file (default: stdout).
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Import a JSON history export.
    Import {
        file: PathBuf,

        /// Replace the current history instead of merging.
        #[arg(long)]
        replace: bool,
    },
}

#[derive(Debug, Subcommand)]
enum HistoryCommand {
    /// List calculations, newest first.
    List {
        /// Only calculations for this source id.
        #[arg(long)]
        source: Option<String>,

        /// Earliest date, `YYYY-MM-DD` or RFC 3339.
        #[arg(long)]
        since: Option<String>,

        /// Latest date, `YYYY-MM-DD` or RFC 3339.
        #[arg(long)]
        until: Option<String>,

        /// Only calculations for sources in this category.
        #[arg(long)]
        category: Option<String>,

        /// Case-insensitive text matched against source names.
        #[arg(long)]
        search: Option<String>,
    },

    /// Delete one calculation.
    Delete { id: String },

    /// Delete every calculation.
    Clear,

    /// Show summary statistics.
    Stats,
}

impl Command {
    fn needs_store(&self) -> bool {
        !matches!(
            self,
            Command::Sources { .. } | Command::Top { .. } | Command::Rating { .. } | Command::Compare { .. }
        )
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging(DEFAULT_LOG_LEVEL);

    let cli = Cli::parse();

    let settings = Settings::resolve(Overrides {
        config: cli.config,
        backend: cli.backend,
        db: cli.db,
        catalog: cli.catalog,
        log_level: cli.log_level,
        log_file: cli.log_file,
    })?;

    logging::apply_configured_level(&settings.log_level)?;
    if let Some(path) = &settings.log_file {
        logging::enable_file_logging(path)?;
    }

    let catalog = load_catalog(settings.catalog_path.as_deref()).context("Failed to load catalog")?;
    debug!(sources = catalog.len(), "catalog loaded");

    let store: Option<Box<dyn HistoryStore>> = if cli.command.needs_store() {
        debug!("connecting to {} backend", settings.db.backend);
        let registry = app::build_registry();
        Some(
            registry
                .create(&settings.db)
                .await
                .with_context(|| format!("Failed to open {} history", settings.db.backend))?,
        )
    } else {
        None
    };
    let store = || {
        store
            .as_deref()
            .context("history store not opened for this command")
    };

    let output = match cli.command {
        Command::Calculate {
            protein,
            dv,
            source,
            no_save,
        } => {
            let request = CalculateRequest {
                protein,
                dv,
                source,
                save: !no_save,
            };
            app::calculate(&catalog, store()?, &request).await?
        }
        Command::Sources { category, search } => {
            app::list_sources(&catalog, category.as_deref(), search.as_deref())?
        }
        Command::Top { limit } => app::top_sources(&catalog, limit)?,
        Command::Rating { source } => app::rating(&catalog, &source)?,
        Command::Compare { first, second } => app::compare(&catalog, &first, &second)?,
        Command::History(HistoryCommand::List {
            source,
            since,
            until,
            category,
            search,
        }) => {
            let filter = HistoryFilter {
                source,
                since,
                until,
                category,
                search,
            };
            app::history_list(store()?, &filter).await?
        }
        Command::History(HistoryCommand::Delete { id }) => {
            app::history_delete(store()?, &id).await?
        }
        Command::History(HistoryCommand::Clear) => app::history_clear(store()?).await?,
        Command::History(HistoryCommand::Stats) => app::history_stats(store()?).await?,
        Command::Export { out } => {
            let json = app::export(store()?).await?;
            match out {
                Some(path) => {
                    std::fs::write(&path, &json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    format!("Exported history to {}", path.display())
                }
                None => json,
            }
        }
        Command::Import { file, replace } => {
            let json = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            app::import(store()?, &json, replace).await?
        }
    };

    println!("{output}");
    Ok(())
}
