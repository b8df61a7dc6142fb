//! pxfind CLI
//!
//! Index and search a statistical table catalogue.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use pxfind_cli::config::load_config;
use pxfind_cli::{commands, config_handlers, Cli, Command};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Config { action } => {
            config_handlers::handle_config_command(cli.config.as_deref(), action)?;
        }
        Command::Index(args) => {
            let config = load_config(cli.config.as_deref())?;
            let stats = commands::cmd_index(&config, &args).await?;
            print!("{}", commands::format_stats(&stats));
        }
        Command::Search(args) => {
            let config = load_config(cli.config.as_deref())?;
            let outcome = commands::cmd_search(&config, &args)?;
            print!("{}", commands::format_outcome(&outcome, args.format)?);
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
