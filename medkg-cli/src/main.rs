//! medkg CLI - build a medical knowledge graph from line-delimited JSON records
//!
//! Parses the disease corpus, persists entities, relationships and disease
//! properties into a DuckDB graph store, and writes a JSON snapshot of every
//! collection.

use clap::{CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::*;
use config::MedkgConfig;
use medkg_core::EntityKind;
use output::OutputFormat;

/// Parse an entity label such as `Disease` or `drug`.
fn parse_kind(s: &str) -> Result<EntityKind, String> {
    EntityKind::parse(s).ok_or_else(|| {
        let known: Vec<_> = EntityKind::ALL.iter().map(|k| k.label()).collect();
        format!("unknown entity kind '{}' (expected one of: {})", s, known.join(", "))
    })
}

/// Medical knowledge-graph builder.
#[derive(Parser)]
#[command(name = "medkg")]
#[command(author, version)]
#[command(about = "Build a medical knowledge graph from disease records")]
#[command(propagate_version = true)]
#[command(after_help = "Quick Start:
  medkg build data/medical.json   Parse, persist and export the corpus
  medkg stats                     Node and edge counts
  medkg check                     Database health check

Examples:
  medkg export --out snapshot     Write JSON snapshot only
  medkg properties --kind Disease --key desc --limit 10")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format (overrides config default)
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Hide progress bars
    #[arg(long, global = true)]
    no_progress: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse the corpus, persist the graph and export a JSON snapshot
    #[command(visible_alias = "b")]
    Build {
        /// Line-delimited JSON corpus
        #[arg(env = "MEDKG_INPUT")]
        input: Option<PathBuf>,

        /// Graph database file
        #[arg(long, env = "MEDKG_DB")]
        db: Option<PathBuf>,

        /// Snapshot directory
        #[arg(long, env = "MEDKG_EXPORT_DIR")]
        export: Option<PathBuf>,

        /// Skip the JSON snapshot
        #[arg(long, conflicts_with = "export")]
        no_export: bool,

        /// Build into an in-memory graph; no database is written
        #[arg(long)]
        dry_run: bool,
    },

    /// Parse the corpus and write the JSON snapshot only
    Export {
        /// Line-delimited JSON corpus
        #[arg(env = "MEDKG_INPUT")]
        input: Option<PathBuf>,

        /// Snapshot directory
        #[arg(short, long, env = "MEDKG_EXPORT_DIR")]
        out: Option<PathBuf>,
    },

    /// Show node and edge counts by label and relation
    #[command(visible_alias = "st")]
    Stats {
        /// Graph database file
        #[arg(long, env = "MEDKG_DB")]
        db: Option<PathBuf>,
    },

    /// Check database connectivity and schema version
    Check {
        /// Graph database file
        #[arg(long, env = "MEDKG_DB")]
        db: Option<PathBuf>,
    },

    /// List nodes carrying a non-empty text property
    Properties {
        /// Entity label, e.g. Disease
        #[arg(long, value_parser = parse_kind)]
        kind: EntityKind,

        /// Property key, e.g. desc
        #[arg(long)]
        key: String,

        /// Maximum number of nodes to list
        #[arg(short, long)]
        limit: Option<usize>,

        /// Graph database file
        #[arg(long, env = "MEDKG_DB")]
        db: Option<PathBuf>,
    },
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn,medkg=info,medkg_core=info,medkg_graph=info"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    // Load configuration from .medkgrc.toml
    let config = MedkgConfig::load(Path::new("."));

    // Resolve output format: CLI flag > config default > Table
    let format = cli.format.unwrap_or_else(|| {
        config
            .default_format()
            .and_then(|f| f.parse().ok())
            .unwrap_or(OutputFormat::Table)
    });

    if let Some(use_color) = config.use_color() {
        colored::control::set_override(use_color);
    }

    let progress = config.progress_enabled() && !cli.no_progress && !cli.quiet;

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            let _ = Cli::command().print_help();
            println!();
            return Ok(());
        }
    };

    match command {
        Commands::Build {
            input,
            db,
            export,
            no_export,
            dry_run,
        } => {
            let options = build::BuildOptions {
                input: config.input_path(input),
                db: config.db_path(db),
                export_dir: (config.export_enabled() && !no_export)
                    .then(|| config.export_dir(export)),
                dry_run,
                progress,
            };
            build::run(options, format).await
        }
        Commands::Export { input, out } => {
            export::run(&config.input_path(input), &config.export_dir(out), format).await
        }
        Commands::Stats { db } => stats::run(&config.db_path(db), format).await,
        Commands::Check { db } => check::run(&config.db_path(db), format).await,
        Commands::Properties {
            kind,
            key,
            limit,
            db,
        } => properties::run(&config.db_path(db), kind, &key, limit, format).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!(parse_kind("Disease"), Ok(EntityKind::Disease));
        let err = parse_kind("Gene").unwrap_err();
        assert!(err.contains("Symptom"));
    }

    #[test]
    fn test_build_flags() {
        let cli = Cli::try_parse_from([
            "medkg",
            "build",
            "corpus.json",
            "--db",
            "g.duckdb",
            "--no-export",
            "--dry-run",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Build {
                input,
                db,
                no_export,
                dry_run,
                ..
            }) => {
                assert_eq!(input, Some(PathBuf::from("corpus.json")));
                assert_eq!(db, Some(PathBuf::from("g.duckdb")));
                assert!(no_export);
                assert!(dry_run);
            }
            _ => panic!("expected build command"),
        }
    }

    #[test]
    fn test_export_conflicts_with_no_export() {
        assert!(Cli::try_parse_from(["medkg", "build", "--export", "out", "--no-export"]).is_err());
    }
}
