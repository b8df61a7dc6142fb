//! Read-only search over an index snapshot.
//!
//! A [`Searcher`] takes one point-in-time snapshot of the index when it is
//! opened and answers every query from that snapshot. It never takes the
//! writer lock and does not observe commits made after it was opened; open
//! a new searcher to see them.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use pxfind_core::date::parse_px_date;
use pxfind_core::{Error, Result};
use tantivy::collector::TopDocs;
use tantivy::schema::Value;
use tantivy::{Index, IndexReader, ReloadPolicy, TantivyDocument};

use crate::indexer::INDEX_META_FILE;
use crate::query::{resolve_fields, BuiltQuery, QueryBuilder};
use crate::schema::{SchemaField, TableSchema};
use crate::types::{DefaultOperator, SearchConfig, SearchOutcome, SearchResultItem};

/// Snapshot searcher over a table index.
pub struct Searcher {
    index: Index,
    // Kept alive for the lifetime of the snapshot.
    _reader: IndexReader,
    snapshot: tantivy::Searcher,
    schema: TableSchema,
    path: PathBuf,
    operator: DefaultOperator,
    created_at: DateTime<Utc>,
}

impl Searcher {
    /// Open a searcher on the index at `index_path`.
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexNotFound` if no index exists at the path, and
    /// `Error::Storage` if it cannot be read.
    pub fn open(index_path: &Path, config: &SearchConfig) -> Result<Self> {
        if !index_exists(index_path) {
            return Err(Error::index_not_found(index_path));
        }

        let index = Index::open_in_dir(index_path)
            .map_err(|e| Error::storage(format!("Failed to open index: {e}")))?;
        TableSchema::register_tokenizers(&index, config);
        let schema = TableSchema::from_schema(index.schema())?;

        let reader: IndexReader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(|e| Error::storage(format!("Failed to open index reader: {e}")))?;
        let snapshot = reader.searcher();

        log::debug!(
            "Opened snapshot of {:?} with {} document(s)",
            index_path,
            snapshot.num_docs()
        );

        Ok(Self {
            index,
            _reader: reader,
            snapshot,
            schema,
            path: index_path.to_path_buf(),
            operator: config.default_operator,
            created_at: Utc::now(),
        })
    }

    /// Set the operator applied between terms with no explicit operator.
    ///
    /// Only affects this searcher.
    pub fn set_default_operator(&mut self, operator: DefaultOperator) {
        self.operator = operator;
    }

    /// Current default operator.
    pub fn default_operator(&self) -> DefaultOperator {
        self.operator
    }

    /// Search the snapshot.
    ///
    /// `field_filter` is a comma-separated list of field names; `None` or an
    /// empty string searches the default fields. At most `max_results` hits
    /// are returned, highest score first.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedQuery` for a syntax error and
    /// `Error::Storage` if the snapshot cannot be read. A vanished index
    /// directory is not an error; it yields [`SearchStatus::NotIndexed`].
    ///
    /// [`SearchStatus::NotIndexed`]: crate::SearchStatus::NotIndexed
    pub fn search(
        &self,
        text: &str,
        field_filter: Option<&str>,
        max_results: usize,
    ) -> Result<SearchOutcome> {
        if !self.path.exists() {
            log::warn!("Index directory {:?} no longer exists", self.path);
            return Ok(SearchOutcome::not_indexed());
        }

        let fields = resolve_fields(&self.schema, field_filter);
        let query = match QueryBuilder::new(self.operator).build(&self.index, fields, text)? {
            BuiltQuery::Query(query) => query,
            BuiltQuery::MatchesNothing => return Ok(SearchOutcome::successful(Vec::new())),
        };

        if max_results == 0 {
            return Ok(SearchOutcome::successful(Vec::new()));
        }

        let top_docs = self
            .snapshot
            .search(query.as_ref(), &TopDocs::with_limit(max_results).order_by_score())
            .map_err(|e| Error::storage(format!("Search failed: {e}")))?;

        let mut items = Vec::with_capacity(top_docs.len());
        for (score, address) in top_docs {
            let doc: TantivyDocument = self
                .snapshot
                .doc(address)
                .map_err(|e| Error::storage(format!("Failed to load document: {e}")))?;
            items.push(self.to_result_item(&doc, score));
        }

        log::debug!(
            "Query '{}' ({}) returned {} hit(s)",
            text,
            self.operator,
            items.len()
        );

        Ok(SearchOutcome::successful(items))
    }

    /// Number of documents in the snapshot.
    pub fn num_docs(&self) -> u64 {
        self.snapshot.num_docs()
    }

    /// When this searcher was opened.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Index directory of this searcher.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn to_result_item(&self, doc: &TantivyDocument, score: f32) -> SearchResultItem {
        let text = |field: SchemaField| -> String {
            doc.get_first(self.schema.field(field))
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        };

        let published = doc
            .get_first(self.schema.field(SchemaField::Published))
            .and_then(|v| v.as_str())
            .and_then(|s| parse_px_date(s).ok());

        SearchResultItem {
            path: text(SchemaField::Path),
            table: text(SchemaField::Table),
            title: text(SchemaField::Title),
            score,
            published,
        }
    }
}

impl std::fmt::Debug for Searcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Searcher")
            .field("path", &self.path)
            .field("operator", &self.operator)
            .field("num_docs", &self.snapshot.num_docs())
            .finish()
    }
}

/// Check if an index exists at the given path.
pub fn index_exists(index_path: &Path) -> bool {
    index_path.join(INDEX_META_FILE).exists()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::TableRecord;
    use crate::indexer::Indexer;
    use crate::types::SearchStatus;
    use chrono::NaiveDate;
    use pxfind_core::{TableMeta, Variable};

    fn seed(path: &Path, docs: &[(&str, &str)]) {
        let config = SearchConfig::default();
        let mut indexer = Indexer::open(path, &config)
            .unwrap()
            .into_indexer(path)
            .unwrap();
        let published = NaiveDate::from_ymd_opt(2023, 11, 20)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        for (id, title) in docs {
            let record = TableRecord::new("ssd", *id, "PR/PR0101", *id, *title, published);
            let meta = TableMeta::new(*title, *id).with_variable(Variable::new("item", "Vara"));
            indexer.add(&record, &meta).unwrap();
        }
        indexer.end().unwrap();
    }

    #[test]
    fn test_open_missing_index_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = Searcher::open(&temp_dir.path().join("absent"), &SearchConfig::default());
        assert!(matches!(result, Err(Error::IndexNotFound { .. })));
    }

    #[test]
    fn test_search_by_title() {
        let temp_dir = tempfile::tempdir().unwrap();
        seed(temp_dir.path(), &[("PR0101", "Consumer price index")]);

        let searcher = Searcher::open(temp_dir.path(), &SearchConfig::default()).unwrap();
        let outcome = searcher.search("consumer price", None, 10).unwrap();

        assert_eq!(outcome.status, SearchStatus::Successful);
        assert_eq!(outcome.items.len(), 1);
        assert_eq!(outcome.items[0].table, "PR0101");
        assert_eq!(outcome.items[0].path, "PR/PR0101");
        assert!(outcome.items[0].score >= 0.0);
        assert!(outcome.items[0].published.is_some());
    }

    #[test]
    fn test_search_respects_max_results() {
        let temp_dir = tempfile::tempdir().unwrap();
        seed(
            temp_dir.path(),
            &[("A1", "Price one"), ("A2", "Price two"), ("A3", "Price three")],
        );

        let searcher = Searcher::open(temp_dir.path(), &SearchConfig::default()).unwrap();
        assert_eq!(searcher.search("price", None, 2).unwrap().items.len(), 2);
        assert!(searcher.search("price", None, 0).unwrap().is_empty());
    }

    #[test]
    fn test_field_filter_limits_fields() {
        let temp_dir = tempfile::tempdir().unwrap();
        seed(temp_dir.path(), &[("PR0101", "Consumer price index")]);

        let searcher = Searcher::open(temp_dir.path(), &SearchConfig::default()).unwrap();
        assert_eq!(searcher.search("consumer", Some("title"), 10).unwrap().items.len(), 1);
        assert!(searcher.search("consumer", Some("codes"), 10).unwrap().is_empty());
        assert!(searcher.search("consumer", Some("bogus,"), 10).unwrap().is_empty());
    }

    #[test]
    fn test_search_id_is_searchable() {
        let temp_dir = tempfile::tempdir().unwrap();
        seed(temp_dir.path(), &[("PR0101", "Consumer price index")]);

        let searcher = Searcher::open(temp_dir.path(), &SearchConfig::default()).unwrap();
        let outcome = searcher.search("pr0101", Some("searchid"), 10).unwrap();
        assert_eq!(outcome.items.len(), 1);
    }

    #[test]
    fn test_unknown_field_in_query_never_matches() {
        let temp_dir = tempfile::tempdir().unwrap();
        seed(temp_dir.path(), &[("PR0101", "Consumer price index")]);

        let searcher = Searcher::open(temp_dir.path(), &SearchConfig::default()).unwrap();
        let alone = searcher.search("nosuchfield:price", None, 10).unwrap();
        assert_eq!(alone.status, SearchStatus::Successful);
        assert!(alone.is_empty());

        let mixed = searcher.search("nosuchfield:price consumer", None, 10).unwrap();
        assert_eq!(mixed.items.len(), 1);
    }

    #[test]
    fn test_syntax_error_is_malformed_query() {
        let temp_dir = tempfile::tempdir().unwrap();
        seed(temp_dir.path(), &[("PR0101", "Consumer price index")]);

        let searcher = Searcher::open(temp_dir.path(), &SearchConfig::default()).unwrap();
        let result = searcher.search("title:(consumer", None, 10);
        assert!(matches!(result, Err(Error::MalformedQuery { .. })));
    }

    #[test]
    fn test_stopword_only_query_is_empty_success() {
        let temp_dir = tempfile::tempdir().unwrap();
        seed(temp_dir.path(), &[("PR0101", "Consumer price index")]);

        let searcher = Searcher::open(temp_dir.path(), &SearchConfig::default()).unwrap();
        let outcome = searcher.search("of the", None, 10).unwrap();
        assert_eq!(outcome.status, SearchStatus::Successful);
        assert!(outcome.is_empty());
    }

    #[test]
    fn test_set_default_operator_is_per_instance() {
        let temp_dir = tempfile::tempdir().unwrap();
        seed(temp_dir.path(), &[("PR0101", "Consumer price index")]);

        let mut first = Searcher::open(temp_dir.path(), &SearchConfig::default()).unwrap();
        let second = Searcher::open(temp_dir.path(), &SearchConfig::default()).unwrap();
        first.set_default_operator(DefaultOperator::And);

        assert_eq!(first.default_operator(), DefaultOperator::And);
        assert_eq!(second.default_operator(), DefaultOperator::Or);
    }

    #[test]
    fn test_created_at_is_open_time() {
        let temp_dir = tempfile::tempdir().unwrap();
        seed(temp_dir.path(), &[("PR0101", "Consumer price index")]);

        let before = Utc::now();
        let searcher = Searcher::open(temp_dir.path(), &SearchConfig::default()).unwrap();
        assert!(searcher.created_at() >= before);
        assert!(searcher.created_at() <= Utc::now());
        assert_eq!(searcher.path(), temp_dir.path());
    }

    #[test]
    fn test_searcher_debug() {
        let temp_dir = tempfile::tempdir().unwrap();
        seed(temp_dir.path(), &[("PR0101", "Consumer price index")]);
        let searcher = Searcher::open(temp_dir.path(), &SearchConfig::default()).unwrap();
        let debug = format!("{:?}", searcher);
        assert!(debug.contains("Searcher"));
        assert!(debug.contains("num_docs"));
    }
}
