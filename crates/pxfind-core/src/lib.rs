//! Shared errors, publication dates, and the table metadata model for pxfind.
//!
//! This crate has no internal pxfind dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`date`]: Fixed-format publication date helpers
//! - [`meta`]: Table metadata trait and concrete model

pub mod date;
pub mod error;
pub mod meta;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};
pub use meta::{Classification, TableMeta, TableMetadata, Variable, VariableValue};
