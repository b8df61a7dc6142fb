//! # pxfind-cli
//!
//! Command-line front end for the table catalogue index:
//! - `pxfind index` builds or refreshes the index from a catalogue directory
//! - `pxfind search` queries it
//! - `pxfind config` manages the TOML configuration file

#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_handlers;

pub use cli::{Cli, Command, ConfigAction, OutputFormat};
