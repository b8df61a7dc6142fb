//! Full-text indexing and search over a statistical table catalogue.
//!
//! Each table becomes one document: where it lives (database, path, table
//! name), its title and publication date, and the flattened text of its
//! metadata (variables, values, codes, groupings, value sets). The index is
//! written by one [`Indexer`] session at a time and read by any number of
//! snapshot [`Searcher`]s.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       pxfind-fts                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TableSchema (18-field registry, px_standard analyzer)      │
//! │  TableDocument (record + metadata → field values)           │
//! │  QueryBuilder (field filter, default operator)              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Indexer (locked writer session: add / update / end)        │
//! │  Searcher (point-in-time snapshot, ranked hits)             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  IndexBuilder (catalogue directory → upserts in batches)    │
//! │  IndexMetadata (catalogue + analyzer fingerprint)           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Fields
//!
//! | Field | Mode | Notes |
//! |-------|------|-------|
//! | `docid` | exact, stored | update key |
//! | `searchid` | tokenized | the doc id, searchable |
//! | `path`, `table` | stored | returned in hits |
//! | `database`, `published` | exact, stored | `published` is `yyyyMMdd HH:mm` |
//! | `matrix`, `title`, `tableid` | tokenized, stored | |
//! | `variables` … `valuesetcodes` | tokenized | flattened metadata |
//! | `synonyms` | tokenized | only when non-empty |
//!
//! # Example
//!
//! ```rust,ignore
//! use pxfind_fts::{Indexer, SearchConfig, Searcher};
//!
//! let config = SearchConfig::default();
//! let mut indexer = Indexer::open(&index_path, &config)?.into_indexer(&index_path)?;
//! indexer.update(&record, &meta)?;
//! indexer.end()?;
//! drop(indexer);
//!
//! let searcher = Searcher::open(&index_path, &config)?;
//! for hit in searcher.search("population region", None, 10)?.items {
//!     println!("{} {} ({})", hit.path, hit.table, hit.score);
//! }
//! ```

pub mod builder;
pub mod document;
pub mod freshness;
pub mod indexer;
pub mod query;
pub mod schema;
pub mod searcher;
pub mod stopwords;
pub mod types;

pub use builder::{parse_catalogue, CatalogueEntry, IndexBuilder, IndexStats};
pub use document::{TableDocument, TableRecord};
pub use freshness::{catalogue_hash, is_index_fresh, IndexMetadata, Staleness};
pub use indexer::{Indexer, OpenOutcome};
pub use query::QueryBuilder;
pub use schema::{FieldMode, SchemaField, TableSchema};
pub use searcher::{index_exists, Searcher};
pub use types::{DefaultOperator, SearchConfig, SearchOutcome, SearchResultItem, SearchStatus};
