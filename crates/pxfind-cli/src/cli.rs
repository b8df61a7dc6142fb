//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use pxfind_fts::DefaultOperator;

/// Index and search a statistical table catalogue.
#[derive(Parser, Debug)]
#[command(name = "pxfind", author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Index a catalogue directory of table metadata files
    Index(IndexArgs),
    /// Search the index
    Search(SearchArgs),
    /// Configuration file management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Arguments for `pxfind index`.
#[derive(Args, Debug, Clone, Default)]
pub struct IndexArgs {
    /// Catalogue directory (overrides `catalogue_path`)
    #[arg(long)]
    pub catalogue: Option<PathBuf>,

    /// Index directory (overrides `index_path`)
    #[arg(long)]
    pub index: Option<PathBuf>,

    /// Re-index even if the catalogue is unchanged
    #[arg(long)]
    pub force: bool,

    /// Tables per commit (overrides `batch_size`)
    #[arg(long)]
    pub batch_size: Option<usize>,
}

/// Arguments for `pxfind search`.
#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Query text
    pub query: String,

    /// Comma-separated fields to search (default: all text fields)
    #[arg(short, long)]
    pub fields: Option<String>,

    /// Maximum number of results (overrides `default_limit`)
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Operator between terms: `or` or `and`
    #[arg(long)]
    pub operator: Option<DefaultOperator>,

    /// Index directory (overrides `index_path`)
    #[arg(long)]
    pub index: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Search output format.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One line per hit
    #[default]
    Text,
    /// The full outcome as JSON
    Json,
}

/// `pxfind config` subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Print the resolved config file path
    Path,
    /// Print the effective configuration as TOML
    Show,
    /// Write a default config file
    Init {
        /// Where to write (default: the platform config path)
        #[arg(long)]
        file: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
