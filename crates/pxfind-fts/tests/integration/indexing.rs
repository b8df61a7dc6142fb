//! Writer session behaviour: visibility, exact-title recall, updates,
//! locking, rollback.

use pxfind_core::{Error, TableMeta};
use pxfind_fts::{DefaultOperator, Indexer, OpenOutcome};

use crate::common::{meta, record, TestIndex};

#[test]
fn test_added_table_is_found_by_title() {
    let index = TestIndex::new();
    index.seed(&[("BE0101A", "Population by region")]);

    let outcome = index
        .searcher()
        .search("population by region", Some("title"), 10)
        .unwrap();
    assert_eq!(outcome.items.len(), 1);
    assert_eq!(outcome.items[0].title, "Population by region");
    assert_eq!(outcome.items[0].path, "BE/BE0101");
}

#[test]
fn test_tables_are_found_by_exact_title() {
    let tables = [
        ("AM0401B", "Number of new members by year and area"),
        ("PR0101A", "Consumer price index"),
        ("BE0101H", "Births: by sex and region"),
        ("HE0110A", "Income of men and women"),
        ("BO0104X", "Value of the group index"),
    ];
    let index = TestIndex::new();
    index.seed(&tables);

    for operator in [DefaultOperator::Or, DefaultOperator::And] {
        let mut searcher = index.searcher();
        searcher.set_default_operator(operator);
        for (id, title) in tables {
            for fields in [None, Some("title")] {
                let outcome = searcher.search(title, fields, 10).unwrap();
                assert!(
                    outcome.items.iter().any(|item| item.table == id),
                    "{title:?} ({operator}, {fields:?}) missed {id}"
                );
            }
        }
    }
}

#[test]
fn test_common_statistics_terms_stay_searchable() {
    let index = TestIndex::new();
    index.seed(&[
        ("PR0101A", "Consumer price index"),
        ("AM0401B", "Number of new members by year and area"),
    ]);
    let searcher = index.searcher();

    for (term, id) in [
        ("index", "PR0101A"),
        ("number", "AM0401B"),
        ("year", "AM0401B"),
        ("members", "AM0401B"),
    ] {
        let outcome = searcher.search(term, Some("title"), 10).unwrap();
        assert_eq!(outcome.items.len(), 1, "{term}");
        assert_eq!(outcome.items[0].table, id);
    }
}

#[test]
fn test_incomplete_metadata_is_not_persisted() {
    let index = TestIndex::new();
    let mut indexer = index.indexer();

    let no_variables = TableMeta::new("Housing stock", "BO0104");
    let result = indexer.add(&record("BO0104", "Housing stock"), &no_variables);
    assert!(matches!(result, Err(Error::IncompleteMetadata { .. })));

    let result = indexer.update(&record("BO0104", "Housing stock"), &no_variables);
    assert!(matches!(result, Err(Error::IncompleteMetadata { .. })));

    indexer.end().unwrap();
    drop(indexer);

    let searcher = index.searcher();
    assert_eq!(searcher.num_docs(), 0);
    assert!(searcher.search("housing", None, 10).unwrap().is_empty());
}

#[test]
fn test_update_replaces_existing_table() {
    let index = TestIndex::new();
    index.seed(&[("BE0101A", "Population by region")]);

    let mut indexer = index.indexer();
    let title = "Inhabitants per county";
    indexer
        .update(&record("BE0101A", title), &meta("BE0101A", title))
        .unwrap();
    indexer.end().unwrap();
    drop(indexer);

    let searcher = index.searcher();
    assert_eq!(searcher.num_docs(), 1);
    assert!(searcher.search("population", Some("title"), 10).unwrap().is_empty());
    let outcome = searcher.search("inhabitants", Some("title"), 10).unwrap();
    assert_eq!(outcome.items.len(), 1);
    assert_eq!(outcome.items[0].table, "BE0101A");
}

#[test]
fn test_update_inserts_unknown_id() {
    let index = TestIndex::new();
    index.seed(&[("BE0101A", "Population by region")]);

    let mut indexer = index.indexer();
    indexer
        .update(&record("BO0104", "Housing stock"), &meta("BO0104", "Housing stock"))
        .unwrap();
    indexer.end().unwrap();
    drop(indexer);

    assert_eq!(index.searcher().num_docs(), 2);
}

#[test]
fn test_second_writer_is_locked_out() {
    let index = TestIndex::new();
    index.seed(&[("BE0101A", "Population by region")]);

    let mut holder = index.indexer();
    holder
        .add(&record("BO0104", "Housing stock"), &meta("BO0104", "Housing stock"))
        .unwrap();

    let second = Indexer::open(index.path(), &index.config).unwrap();
    assert!(second.is_locked());
    let err = second.into_indexer(index.path()).unwrap_err();
    assert!(err.is_retryable());

    // The lock conflict itself changed nothing.
    assert_eq!(index.searcher().num_docs(), 1);

    holder.end().unwrap();
    drop(holder);
    assert_eq!(index.searcher().num_docs(), 2);
}

#[test]
fn test_lock_is_released_after_close() {
    let index = TestIndex::new();
    let indexer = index.indexer();
    indexer.close().unwrap();

    assert!(matches!(
        Indexer::open(index.path(), &index.config).unwrap(),
        OpenOutcome::Opened(_)
    ));
}

#[test]
fn test_drop_without_end_rolls_back() {
    let index = TestIndex::new();
    index.seed(&[("BE0101A", "Population by region")]);

    {
        let mut indexer = index.indexer();
        indexer
            .add(&record("BO0104", "Housing stock"), &meta("BO0104", "Housing stock"))
            .unwrap();
        assert_eq!(indexer.pending(), 1);
    }

    let searcher = index.searcher();
    assert_eq!(searcher.num_docs(), 1);
    assert!(searcher.search("housing", None, 10).unwrap().is_empty());

    // The rolled-back session released its lock.
    let mut indexer = index.indexer();
    indexer
        .add(&record("BO0104", "Housing stock"), &meta("BO0104", "Housing stock"))
        .unwrap();
    indexer.end().unwrap();
    drop(indexer);
    assert_eq!(index.searcher().num_docs(), 2);
}

#[test]
fn test_end_then_more_work_only_keeps_ended_batches() {
    let index = TestIndex::new();
    let mut indexer = index.indexer();
    indexer
        .add(&record("A1", "Population"), &meta("A1", "Population"))
        .unwrap();
    indexer.end().unwrap();
    indexer
        .add(&record("A2", "Housing"), &meta("A2", "Housing"))
        .unwrap();
    indexer.close().unwrap();

    let searcher = index.searcher();
    assert_eq!(searcher.num_docs(), 1);
    assert_eq!(searcher.search("population", None, 10).unwrap().items.len(), 1);
}
