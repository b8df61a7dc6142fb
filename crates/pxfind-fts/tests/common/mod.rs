//! Shared fixtures for the integration suite.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use pxfind_core::{TableMeta, Variable};
use pxfind_fts::{Indexer, SearchConfig, Searcher, TableRecord};
use tempfile::TempDir;

/// An index directory that is removed when the fixture is dropped.
pub struct TestIndex {
    _root: TempDir,
    path: PathBuf,
    pub config: SearchConfig,
}

impl TestIndex {
    pub fn new() -> Self {
        let root = TempDir::new().unwrap();
        let path = root.path().join("index");
        Self {
            _root: root,
            path,
            config: SearchConfig::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a writer session, failing the test if the index is locked.
    pub fn indexer(&self) -> Indexer {
        Indexer::open(&self.path, &self.config)
            .unwrap()
            .into_indexer(&self.path)
            .unwrap()
    }

    pub fn searcher(&self) -> Searcher {
        Searcher::open(&self.path, &self.config).unwrap()
    }

    /// Index tables in one committed session.
    pub fn seed(&self, tables: &[(&str, &str)]) {
        let mut indexer = self.indexer();
        for (id, title) in tables {
            indexer.add(&record(id, title), &meta(id, title)).unwrap();
        }
        indexer.end().unwrap();
    }
}

pub fn published() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 11, 20)
        .unwrap()
        .and_hms_opt(9, 15, 42)
        .unwrap()
}

pub fn record(id: &str, title: &str) -> TableRecord {
    TableRecord::new("ssd", id, "BE/BE0101", id, title, published())
}

pub fn meta(id: &str, title: &str) -> TableMeta {
    TableMeta::new(title, id).with_variable(
        Variable::new("region", "Region")
            .value("0180", "Stockholm")
            .grouping("lan", "Counties"),
    )
}
