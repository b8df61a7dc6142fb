//! Searcher behaviour: snapshots, operators, fields, and result projection.

use pxfind_core::date::truncate_to_minute;
use pxfind_core::Error;
use pxfind_fts::schema::SchemaField;
use pxfind_fts::{DefaultOperator, SearchStatus, TableDocument, TableSchema};
use tantivy::{Index, IndexWriter, TantivyDocument};

use crate::common::{meta, published, record, TestIndex};

#[test]
fn test_vanished_index_reports_not_indexed() {
    let index = TestIndex::new();
    index.seed(&[("BE0101A", "Population by region")]);

    let searcher = index.searcher();
    std::fs::remove_dir_all(index.path()).unwrap();

    let outcome = searcher.search("population", None, 10).unwrap();
    assert_eq!(outcome.status, SearchStatus::NotIndexed);
    assert!(outcome.items.is_empty());
}

#[test]
fn test_or_and_operators() {
    let index = TestIndex::new();
    index.seed(&[
        ("A1", "Alpha series"),
        ("A2", "Beta series"),
        ("A3", "Alpha beta series"),
    ]);

    let mut searcher = index.searcher();
    let either = searcher.search("alpha beta", Some("title"), 10).unwrap();
    assert_eq!(either.items.len(), 3);
    assert_eq!(either.items[0].table, "A3");

    searcher.set_default_operator(DefaultOperator::And);
    let both = searcher.search("alpha beta", Some("title"), 10).unwrap();
    assert_eq!(both.items.len(), 1);
    assert_eq!(both.items[0].table, "A3");
}

#[test]
fn test_results_are_ordered_by_score() {
    let index = TestIndex::new();
    index.seed(&[("A1", "Alpha series"), ("A3", "Alpha beta series")]);

    let items = index
        .searcher()
        .search("alpha beta", Some("title"), 10)
        .unwrap()
        .items;
    assert!(items.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn test_snapshot_does_not_see_later_commits() {
    let index = TestIndex::new();
    index.seed(&[("A1", "Population")]);

    let before = index.searcher();
    index.seed(&[("A2", "Population change")]);

    assert_eq!(before.num_docs(), 1);
    assert_eq!(before.search("population", None, 10).unwrap().items.len(), 1);
    assert_eq!(index.searcher().search("population", None, 10).unwrap().items.len(), 2);
}

#[test]
fn test_metadata_fields_are_searchable() {
    let index = TestIndex::new();
    index.seed(&[("BE0101A", "Population by region")]);
    let searcher = index.searcher();

    assert_eq!(searcher.search("stockholm", Some("values"), 10).unwrap().items.len(), 1);
    assert_eq!(searcher.search("0180", Some("codes"), 10).unwrap().items.len(), 1);
    assert_eq!(searcher.search("counties", None, 10).unwrap().items.len(), 1);
    assert!(searcher.search("stockholm", Some("title"), 10).unwrap().is_empty());
}

#[test]
fn test_explicit_field_in_query_text() {
    let index = TestIndex::new();
    index.seed(&[("BE0101A", "Population by region")]);
    let searcher = index.searcher();

    let outcome = searcher.search("matrix:be0101a", None, 10).unwrap();
    assert_eq!(outcome.items.len(), 1);

    let result = searcher.search("title:(population", None, 10);
    assert!(matches!(result, Err(Error::MalformedQuery { .. })));
}

#[test]
fn test_published_round_trips_at_minute_precision() {
    let index = TestIndex::new();
    index.seed(&[("BE0101A", "Population by region")]);

    let outcome = index.searcher().search("population", None, 10).unwrap();
    assert_eq!(
        outcome.items[0].published,
        Some(truncate_to_minute(&published()))
    );
}

#[test]
fn test_unparseable_published_yields_none() {
    let index = TestIndex::new();
    index.seed(&[]);

    // Write a document whose published value is not a date, bypassing the
    // indexer's formatting.
    {
        let tantivy_index = Index::open_in_dir(index.path()).unwrap();
        TableSchema::register_tokenizers(&tantivy_index, &index.config);
        let schema = TableSchema::from_schema(tantivy_index.schema()).unwrap();
        let doc = TableDocument::build(
            &record("X1", "Trade balance"),
            &meta("X1", "Trade balance"),
        );

        let mut raw = TantivyDocument::new();
        for (field, value) in doc.iter() {
            let value = if field == SchemaField::Published { "soon" } else { value };
            raw.add_text(schema.field(field), value);
        }

        let mut writer: IndexWriter = tantivy_index.writer(50_000_000).unwrap();
        writer.add_document(raw).unwrap();
        writer.commit().unwrap();
    }

    let outcome = index.searcher().search("trade", None, 10).unwrap();
    assert_eq!(outcome.items.len(), 1);
    assert_eq!(outcome.items[0].published, None);
}
