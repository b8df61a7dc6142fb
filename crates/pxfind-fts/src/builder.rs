//! Catalogue index builder.
//!
//! Walks a catalogue directory of JSON files, each holding one
//! [`CatalogueEntry`] or an array of them, and upserts every table into the
//! index through a single writer session.
//!
//! ```json
//! {
//!   "database": "ssd",
//!   "id": "BE0101A",
//!   "path": "BE/BE0101",
//!   "table": "BefolkningNy",
//!   "title": "Population by region",
//!   "published": "2024-03-01T08:00:00",
//!   "meta": {
//!     "title": "Population by region",
//!     "matrix": "BE0101A",
//!     "variables": [{ "name": "region", "code": "Region" }]
//!   }
//! }
//! ```
//!
//! Entries are written with [`Indexer::update`], so rebuilding never
//! duplicates a table. Tables that fail the completeness check are counted
//! and skipped. Work is committed every `batch_size` tables and once at the
//! end.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_walkdir::WalkDir;
use futures::StreamExt;
use pxfind_core::{Error, Result, TableMeta};
use serde::{Deserialize, Serialize};

use crate::document::TableRecord;
use crate::freshness::{catalogue_hash, fresh_metadata, IndexMetadata};
use crate::indexer::Indexer;
use crate::types::SearchConfig;

/// File extension of catalogue entries.
pub const CATALOGUE_EXTENSION: &str = "json";

/// One table in the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogueEntry {
    /// Where the table lives.
    #[serde(flatten)]
    pub record: TableRecord,
    /// The table's descriptive metadata.
    pub meta: TableMeta,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogueFile {
    Many(Vec<CatalogueEntry>),
    One(Box<CatalogueEntry>),
}

impl CatalogueFile {
    fn into_entries(self) -> Vec<CatalogueEntry> {
        match self {
            CatalogueFile::Many(entries) => entries,
            CatalogueFile::One(entry) => vec![*entry],
        }
    }
}

/// Parse the contents of a catalogue file.
pub fn parse_catalogue(content: &str) -> Result<Vec<CatalogueEntry>> {
    serde_json::from_str::<CatalogueFile>(content)
        .map(CatalogueFile::into_entries)
        .map_err(|e| Error::parse(format!("Invalid catalogue entry: {e}")))
}

/// Statistics from a catalogue build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    /// Catalogue files read.
    pub files_processed: usize,
    /// Tables written to the index.
    pub documents_indexed: usize,
    /// Tables rejected for incomplete metadata.
    pub documents_skipped: usize,
    /// Files or tables that failed for any other reason.
    pub errors: usize,
    /// Catalogue hash the build corresponds to.
    pub content_hash: String,
    /// The index was already fresh and nothing was written.
    pub skipped_fresh: bool,
}

/// Bulk builder for a table index.
pub struct IndexBuilder {
    config: SearchConfig,
    batch_size: usize,
    skip_freshness_check: bool,
}

impl IndexBuilder {
    /// Create a builder using the batch size from `config`.
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            config: config.clone(),
            batch_size: config.batch_size.max(1),
            skip_freshness_check: false,
        }
    }

    /// Set the number of tables written between commits.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Skip the freshness check and always rebuild.
    pub fn force_rebuild(mut self) -> Self {
        self.skip_freshness_check = true;
        self
    }

    /// Index every catalogue entry under `catalogue_path` into `index_path`.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if the catalogue does not exist,
    /// `Error::LockConflict` if another writer holds the index, and storage
    /// errors from committing. Unreadable files and entries are logged and
    /// counted in [`IndexStats::errors`].
    pub async fn build(&self, catalogue_path: &Path, index_path: &Path) -> Result<IndexStats> {
        if !catalogue_path.exists() {
            return Err(Error::not_found(
                catalogue_path.to_string_lossy(),
                "catalogue directory",
            ));
        }

        let content_hash = catalogue_hash(catalogue_path).await?;

        if !self.skip_freshness_check {
            if let Some(metadata) = fresh_metadata(index_path, &content_hash, &self.config).await {
                log::info!("Index is fresh, skipping rebuild");
                return Ok(IndexStats {
                    documents_indexed: metadata.table_count,
                    content_hash,
                    skipped_fresh: true,
                    ..Default::default()
                });
            }
        }

        log::info!("Indexing catalogue {:?} into {:?}", catalogue_path, index_path);

        let mut indexer = Indexer::open(index_path, &self.config)?.into_indexer(index_path)?;

        let extensions: HashSet<String> = [CATALOGUE_EXTENSION.to_string()].into();
        let files = find_files_with_extensions(catalogue_path, &extensions).await?;

        let mut stats = IndexStats {
            content_hash: content_hash.clone(),
            ..Default::default()
        };

        for file_path in files {
            stats.files_processed += 1;

            let content = match tokio::fs::read_to_string(&file_path).await {
                Ok(c) => c,
                Err(e) => {
                    log::warn!("Failed to read {:?}: {}", file_path, e);
                    stats.errors += 1;
                    continue;
                }
            };

            let entries = match parse_catalogue(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    log::warn!("Skipping {:?}: {}", file_path, e);
                    stats.errors += 1;
                    continue;
                }
            };

            for entry in entries {
                match indexer.update(&entry.record, &entry.meta) {
                    Ok(()) => stats.documents_indexed += 1,
                    Err(Error::IncompleteMetadata { id, reason }) => {
                        log::warn!("Skipping table '{}' in {:?}: {}", id, file_path, reason);
                        stats.documents_skipped += 1;
                    }
                    Err(e) => {
                        log::warn!("Failed to index table '{}': {}", entry.record.id, e);
                        stats.errors += 1;
                    }
                }

                if indexer.pending() >= self.batch_size {
                    indexer.end()?;
                }
            }
        }

        indexer.end()?;
        indexer.close()?;

        IndexMetadata::record(content_hash, &self.config, stats.documents_indexed)
            .write(index_path)
            .await?;

        log::info!(
            "Indexed {} table(s) from {} file(s) ({} skipped, {} errors)",
            stats.documents_indexed,
            stats.files_processed,
            stats.documents_skipped,
            stats.errors
        );

        Ok(stats)
    }
}

impl std::fmt::Debug for IndexBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexBuilder")
            .field("batch_size", &self.batch_size)
            .field("skip_freshness_check", &self.skip_freshness_check)
            .finish()
    }
}

/// Find all files with the given extensions in a directory tree.
///
/// Extensions are matched case-insensitively and given lowercase without
/// the dot. The result is sorted.
pub async fn find_files_with_extensions(
    root: &Path,
    extensions: &HashSet<String>,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut walker = WalkDir::new(root);

    while let Some(entry) = walker.next().await {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                log::warn!("Walk error: {}", e);
                continue;
            }
        };

        let path = entry.path();
        if path.is_dir() {
            continue;
        }

        if let Some(ext) = path.extension() {
            if extensions.contains(&ext.to_string_lossy().to_lowercase()) {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

// ============================================================================
// Tests
// ============================================================================
