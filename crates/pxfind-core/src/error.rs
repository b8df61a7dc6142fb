//! Error types for pxfind.
//!
//! A single error enum is shared by the core, indexing, and search crates.
//! Lock conflicts are the only retryable condition; everything else signals
//! caller misuse or an environment fault.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for pxfind operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while indexing or searching the table catalogue.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Another writer session holds the index directory lock.
    #[error("Index at {} is locked by another writer", path.display())]
    LockConflict {
        /// Index directory that is locked.
        path: PathBuf,
    },

    /// No index exists at the given location.
    #[error("No index found at {}", path.display())]
    IndexNotFound {
        /// Index directory that was expected.
        path: PathBuf,
    },

    /// The query text could not be parsed.
    #[error("Malformed query '{query}': {message}")]
    MalformedQuery {
        /// Query text as supplied by the caller.
        query: String,
        /// Parser diagnostic.
        message: String,
    },

    /// Table metadata lacks a field required to build a document.
    #[error("Incomplete metadata for table '{id}': {reason}")]
    IncompleteMetadata {
        /// Document id of the rejected table.
        id: String,
        /// Which precondition failed.
        reason: String,
    },

    /// Failure inside the index storage engine.
    #[error("Storage error: {message}")]
    Storage {
        /// What went wrong.
        message: String,
    },

    /// I/O error with the offending path attached.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic.
        message: String,
    },

    /// Parse error (metadata JSON, config, etc).
    #[error("Parse error: {message}")]
    Parse {
        /// What could not be parsed.
        message: String,
    },

    /// A required resource was not found.
    #[error("{kind} not found: {name}")]
    NotFound {
        /// Name or path of the missing resource.
        name: String,
        /// Kind of resource.
        kind: String,
    },

    /// Generic operation failure.
    #[error("Operation failed: {message}")]
    Operation {
        /// What went wrong.
        message: String,
    },
}

impl Error {
    /// Returns whether the failed operation may succeed if retried later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::LockConflict { .. })
    }

    /// Creates a lock conflict error.
    pub fn lock_conflict(path: impl AsRef<Path>) -> Self {
        Error::LockConflict {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Creates an index-not-found error.
    pub fn index_not_found(path: impl AsRef<Path>) -> Self {
        Error::IndexNotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Creates a malformed query error.
    pub fn malformed_query(query: impl Into<String>, message: impl Into<String>) -> Self {
        Error::MalformedQuery {
            query: query.into(),
            message: message.into(),
        }
    }

    /// Creates an incomplete metadata error.
    pub fn incomplete_metadata(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::IncompleteMetadata {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Creates a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Error::Storage {
            message: message.into(),
        }
    }

    /// Wraps an I/O error with the path that caused it.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Error::Parse {
            message: message.into(),
        }
    }

    /// Creates a not-found error.
    pub fn not_found(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Error::NotFound {
            name: name.into(),
            kind: kind.into(),
        }
    }

    /// Creates a generic operation error.
    pub fn operation(message: impl Into<String>) -> Self {
        Error::Operation {
            message: message.into(),
        }
    }
}
