//! Catalogue freshness.
//!
//! Every catalogue build leaves an [`IndexMetadata`] record in the index
//! directory. It pins the three things a build depends on:
//!
//! | Input | Recorded as |
//! |---|---|
//! | catalogue files | `catalogue_hash` over relative path, size and mtime |
//! | analyzer settings | `analyzer`, see [`analyzer_signature`] |
//! | field layout | `schema_version` |
//!
//! The next build recomputes them and skips indexing only when all three
//! match. Catalogue file contents are never read for this.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::time::UNIX_EPOCH;

use chrono::{DateTime, Utc};
use pxfind_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::builder::{find_files_with_extensions, CATALOGUE_EXTENSION};
use crate::schema::SCHEMA_VERSION;
use crate::searcher::index_exists;
use crate::stopwords::analyzer_signature;
use crate::types::SearchConfig;

/// Metadata filename stored in the index directory.
pub const METADATA_FILE: &str = "pxfind-metadata.json";

/// What a catalogue build was made from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexMetadata {
    /// Fingerprint of the catalogue files.
    pub catalogue_hash: String,
    /// Analyzer the tables were tokenized with.
    pub analyzer: String,
    pub schema_version: u32,
    /// Tables written by the build.
    pub table_count: usize,
    pub built_at: DateTime<Utc>,
}

/// Why a recorded build no longer matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Staleness {
    Schema { recorded: u32, current: u32 },
    Analyzer { recorded: String, current: String },
    Catalogue,
}

impl fmt::Display for Staleness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Staleness::Schema { recorded, current } => {
                write!(f, "schema version changed ({recorded} -> {current})")
            }
            Staleness::Analyzer { recorded, current } => {
                write!(f, "analyzer changed ({recorded} -> {current})")
            }
            Staleness::Catalogue => write!(f, "catalogue changed"),
        }
    }
}

impl IndexMetadata {
    /// Describe a build of `catalogue_hash` made with `config`, now.
    pub fn record(catalogue_hash: String, config: &SearchConfig, table_count: usize) -> Self {
        Self {
            catalogue_hash,
            analyzer: analyzer_signature(config),
            schema_version: SCHEMA_VERSION,
            table_count,
            built_at: Utc::now(),
        }
    }

    /// Read the record from an index directory, `None` if there is none.
    pub async fn read(index_path: &Path) -> Result<Option<Self>> {
        let path = index_path.join(METADATA_FILE);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::io_with_path(e, &path)),
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| Error::parse(format!("Invalid index metadata in {path:?}: {e}")))
    }

    /// Write the record into an index directory, creating the directory.
    pub async fn write(&self, index_path: &Path) -> Result<()> {
        tokio::fs::create_dir_all(index_path)
            .await
            .map_err(|e| Error::io_with_path(e, index_path))?;

        let path = index_path.join(METADATA_FILE);
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| Error::operation(format!("Failed to serialize index metadata: {e}")))?;

        tokio::fs::write(&path, content)
            .await
            .map_err(|e| Error::io_with_path(e, &path))
    }

    /// Compare against the current inputs. `None` means still fresh.
    pub fn staleness(&self, catalogue_hash: &str, config: &SearchConfig) -> Option<Staleness> {
        if self.schema_version != SCHEMA_VERSION {
            return Some(Staleness::Schema {
                recorded: self.schema_version,
                current: SCHEMA_VERSION,
            });
        }

        let current = analyzer_signature(config);
        if self.analyzer != current {
            return Some(Staleness::Analyzer {
                recorded: self.analyzer.clone(),
                current,
            });
        }

        if self.catalogue_hash != catalogue_hash {
            return Some(Staleness::Catalogue);
        }

        None
    }
}

/// Fingerprint the catalogue files under `catalogue_path`.
///
/// Only files with the catalogue extension count, each by relative path,
/// size and modification time.
pub async fn catalogue_hash(catalogue_path: &Path) -> Result<String> {
    let extensions: HashSet<String> = [CATALOGUE_EXTENSION.to_string()].into();
    let files = find_files_with_extensions(catalogue_path, &extensions).await?;

    let mut hasher = DefaultHasher::new();
    for file in files {
        let relative = file.strip_prefix(catalogue_path).unwrap_or(&file);
        relative.to_string_lossy().hash(&mut hasher);

        match tokio::fs::metadata(&file).await {
            Ok(meta) => {
                meta.len().hash(&mut hasher);
                meta.modified()
                    .ok()
                    .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                    .map(|d| d.as_nanos())
                    .hash(&mut hasher);
            }
            Err(e) => log::warn!("Cannot stat {:?}: {}", file, e),
        }
    }

    Ok(format!("{:016x}", hasher.finish()))
}

/// The recorded build at `index_path`, if it still matches the inputs.
pub(crate) async fn fresh_metadata(
    index_path: &Path,
    catalogue_hash: &str,
    config: &SearchConfig,
) -> Option<IndexMetadata> {
    if !index_exists(index_path) {
        return None;
    }

    let metadata = match IndexMetadata::read(index_path).await {
        Ok(Some(metadata)) => metadata,
        Ok(None) => return None,
        Err(e) => {
            log::warn!("Ignoring index metadata: {}", e);
            return None;
        }
    };

    match metadata.staleness(catalogue_hash, config) {
        None => Some(metadata),
        Some(reason) => {
            log::info!("Index is stale: {}", reason);
            None
        }
    }
}

/// Check whether the index at `index_path` is up to date with the catalogue
/// and the analyzer settings in `config`.
pub async fn is_index_fresh(
    index_path: &Path,
    catalogue_path: &Path,
    config: &SearchConfig,
) -> Result<bool> {
    let hash = catalogue_hash(catalogue_path).await?;
    Ok(fresh_metadata(index_path, &hash, config).await.is_some())
}

// ============================================================================
// Tests
// ============================================================================
