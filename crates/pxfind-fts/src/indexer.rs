//! Index writer session.
//!
//! [`Indexer`] owns the single writer of an index directory for the length of
//! one bulk operation. Opening creates an empty index if none exists and
//! appends otherwise; there is no destructive recreate.
//!
//! # Session Lifecycle
//!
//! ```text
//! open ──► Opened(indexer) ──► add / update … ──► end() ──► drop
//!   │                              │
//!   └──► Locked                    └──► drop without end() ──► rollback
//! ```
//!
//! Writes become visible to new searchers only after [`Indexer::end`]. Work
//! that was not ended is rolled back when the indexer is dropped or closed,
//! and the directory lock is released in every case.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pxfind_fts::{Indexer, OpenOutcome, SearchConfig, TableRecord};
//!
//! let mut indexer = match Indexer::open(&index_path, &SearchConfig::default())? {
//!     OpenOutcome::Opened(indexer) => indexer,
//!     OpenOutcome::Locked => return retry_later(),
//! };
//!
//! indexer.update(&record, &meta)?;
//! indexer.end()?;
//! ```

use std::path::{Path, PathBuf};

use pxfind_core::{Error, Result, TableMetadata};
use tantivy::directory::error::LockError;
use tantivy::{Index, IndexWriter, TantivyError, Term};

use crate::document::{incomplete_reason, TableDocument, TableRecord};
use crate::schema::{SchemaField, TableSchema};
use crate::types::SearchConfig;

/// File tantivy writes once an index exists in a directory.
pub(crate) const INDEX_META_FILE: &str = "meta.json";

/// Result of trying to open a writer session.
#[derive(Debug)]
pub enum OpenOutcome {
    /// The session is open and holds the directory lock.
    Opened(Indexer),
    /// Another writer holds the directory lock; nothing was changed.
    Locked,
}

impl OpenOutcome {
    /// Returns `true` if the index was locked.
    pub fn is_locked(&self) -> bool {
        matches!(self, OpenOutcome::Locked)
    }

    /// Convert into the indexer, turning a lock conflict into
    /// `Error::LockConflict`.
    pub fn into_indexer(self, index_path: &Path) -> Result<Indexer> {
        match self {
            OpenOutcome::Opened(indexer) => Ok(indexer),
            OpenOutcome::Locked => Err(Error::lock_conflict(index_path)),
        }
    }
}

/// Writer session over an index directory.
pub struct Indexer {
    index: Index,
    writer: Option<IndexWriter>,
    schema: TableSchema,
    path: PathBuf,
    pending: usize,
}

impl Indexer {
    /// Open a writer session on the index at `index_path`.
    ///
    /// Creates the directory and an empty index if absent, otherwise opens the
    /// existing index for appending.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` or `Error::Storage` if the directory or index cannot
    /// be opened. A lock held by another writer is not an error; it is
    /// reported as [`OpenOutcome::Locked`].
    pub fn open(index_path: &Path, config: &SearchConfig) -> Result<OpenOutcome> {
        if !index_path.exists() {
            std::fs::create_dir_all(index_path).map_err(|e| Error::io_with_path(e, index_path))?;
        }

        let (index, schema) = if index_path.join(INDEX_META_FILE).exists() {
            let index = Index::open_in_dir(index_path)
                .map_err(|e| Error::storage(format!("Failed to open index: {e}")))?;
            let schema = TableSchema::from_schema(index.schema())?;
            (index, schema)
        } else {
            log::info!("Creating new index at {:?}", index_path);
            let schema = TableSchema::build();
            let index = Index::create_in_dir(index_path, schema.schema().clone())
                .map_err(|e| Error::storage(format!("Failed to create index: {e}")))?;
            (index, schema)
        };

        TableSchema::register_tokenizers(&index, config);

        let writer: IndexWriter = match index.writer(config.writer_heap_bytes) {
            Ok(writer) => writer,
            Err(TantivyError::LockFailure(LockError::LockBusy, _)) => {
                log::warn!("Index at {:?} is locked by another writer", index_path);
                return Ok(OpenOutcome::Locked);
            }
            Err(e) => {
                return Err(Error::storage(format!(
                    "Failed to create index writer: {e}"
                )));
            }
        };

        log::debug!("Opened writer session on {:?}", index_path);

        Ok(OpenOutcome::Opened(Self {
            index,
            writer: Some(writer),
            schema,
            path: index_path.to_path_buf(),
            pending: 0,
        }))
    }

    /// Append a table document without checking for an existing id.
    ///
    /// # Errors
    ///
    /// Returns `Error::IncompleteMetadata` (and writes nothing) if the record
    /// or metadata fails the completeness check.
    pub fn add<M>(&mut self, record: &TableRecord, meta: &M) -> Result<()>
    where
        M: TableMetadata + ?Sized,
    {
        let doc = self.build_document(record, meta)?;
        let tantivy_doc = doc.to_tantivy(&self.schema);

        self.writer_mut()?
            .add_document(tantivy_doc)
            .map_err(|e| Error::storage(format!("Failed to add document: {e}")))?;
        self.pending += 1;
        Ok(())
    }

    /// Replace the document with the same id, or insert it if none exists.
    ///
    /// The delete and the add become visible together at the next
    /// [`end`](Self::end).
    ///
    /// # Errors
    ///
    /// Returns `Error::IncompleteMetadata` (and writes nothing) if the record
    /// or metadata fails the completeness check.
    pub fn update<M>(&mut self, record: &TableRecord, meta: &M) -> Result<()>
    where
        M: TableMetadata + ?Sized,
    {
        let doc = self.build_document(record, meta)?;
        let tantivy_doc = doc.to_tantivy(&self.schema);
        let id_term = Term::from_field_text(self.schema.field(SchemaField::DocId), &record.id);

        let writer = self.writer_mut()?;
        writer.delete_term(id_term);
        writer
            .add_document(tantivy_doc)
            .map_err(|e| Error::storage(format!("Failed to update document: {e}")))?;
        self.pending += 1;
        Ok(())
    }

    /// Commit the session's work and mark it cleanly finished.
    ///
    /// Further writes start a new unfinished batch.
    pub fn end(&mut self) -> Result<()> {
        let pending = self.pending;
        self.writer_mut()?
            .commit()
            .map_err(|e| Error::storage(format!("Failed to commit index: {e}")))?;
        self.pending = 0;
        log::info!("Committed {} document(s) to {:?}", pending, self.path);
        Ok(())
    }

    /// Release the session, reporting the outcome of any rollback.
    ///
    /// The directory lock is released even if the rollback fails.
    pub fn close(mut self) -> Result<()> {
        self.release()
    }

    /// Number of writes since the last [`end`](Self::end).
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Get reference to the underlying tantivy index.
    pub fn index(&self) -> &Index {
        &self.index
    }

    /// Get the schema.
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Index directory of this session.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn build_document<M>(&self, record: &TableRecord, meta: &M) -> Result<TableDocument>
    where
        M: TableMetadata + ?Sized,
    {
        let doc = TableDocument::build(record, meta);
        if doc.is_empty() {
            let reason = incomplete_reason(record, meta).unwrap_or("empty document");
            log::debug!("Skipping table '{}': {}", record.id, reason);
            return Err(Error::incomplete_metadata(&record.id, reason));
        }
        Ok(doc)
    }

    fn writer_mut(&mut self) -> Result<&mut IndexWriter> {
        self.writer
            .as_mut()
            .ok_or_else(|| Error::operation("writer session already released"))
    }

    fn release(&mut self) -> Result<()> {
        let Some(mut writer) = self.writer.take() else {
            return Ok(());
        };

        let outcome = if self.pending > 0 {
            log::info!(
                "Rolling back {} uncommitted document(s) in {:?}",
                self.pending,
                self.path
            );
            writer
                .rollback()
                .map(|_| ())
                .map_err(|e| Error::storage(format!("Failed to roll back index: {e}")))
        } else {
            Ok(())
        };
        self.pending = 0;

        // Dropping the writer releases the directory lock.
        drop(writer);
        outcome
    }
}

impl Drop for Indexer {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            log::warn!("{e}");
        }
    }
}

impl std::fmt::Debug for Indexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Indexer")
            .field("path", &self.path)
            .field("pending", &self.pending)
            .field("released", &self.writer.is_none())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
