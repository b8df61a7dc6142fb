//! Common types for indexing and search.
//!
//! Configuration, the default boolean operator, and the status/result
//! surface consumed by callers (web layer, CLI).

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use pxfind_core::Error;
use serde::{Deserialize, Serialize};

/// Boolean combinator applied between query terms that carry no explicit
/// operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultOperator {
    /// Any term may match.
    #[default]
    Or,
    /// Every term must match.
    And,
}

impl fmt::Display for DefaultOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultOperator::Or => f.write_str("or"),
            DefaultOperator::And => f.write_str("and"),
        }
    }
}

impl FromStr for DefaultOperator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "or" => Ok(DefaultOperator::Or),
            "and" => Ok(DefaultOperator::And),
            other => Err(Error::config(format!(
                "unknown default operator '{other}' (expected 'or' or 'and')"
            ))),
        }
    }
}

/// Outcome status of a search call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    /// The query ran against the index.
    Successful,
    /// The index directory does not exist (any more).
    NotIndexed,
}

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultItem {
    /// Navigation path of the table.
    pub path: String,
    /// Table name.
    pub table: String,
    /// Table title.
    pub title: String,
    /// Relevance score (higher is better).
    pub score: f32,
    /// Publication date; `None` when the stored value is missing or malformed.
    pub published: Option<NaiveDateTime>,
}

/// Result list plus status of a search call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Hits ordered by descending score.
    pub items: Vec<SearchResultItem>,
    /// Whether the search ran.
    pub status: SearchStatus,
}

impl SearchOutcome {
    /// Outcome for a missing index.
    pub fn not_indexed() -> Self {
        Self {
            items: Vec::new(),
            status: SearchStatus::NotIndexed,
        }
    }

    /// Successful outcome with the given hits.
    pub fn successful(items: Vec<SearchResultItem>) -> Self {
        Self {
            items,
            status: SearchStatus::Successful,
        }
    }

    /// Returns `true` if no hits were found.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Indexing and search configuration.
///
/// The analyzer settings (`stopwords_enabled`, `extended_stopwords`,
/// `custom_stopwords`) must be the same for the writer and every searcher of
/// an index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Path to the search index directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_path: Option<String>,

    /// Path to the catalogue of table metadata files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalogue_path: Option<String>,

    /// Initial default operator for new searchers.
    #[serde(default)]
    pub default_operator: DefaultOperator,

    /// Default result limit.
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Enable English stopword removal in the analyzer.
    #[serde(default = "default_true")]
    pub stopwords_enabled: bool,

    /// Also remove the long English list from `stop-words`.
    ///
    /// Off by default: that list holds words such as "number", "year" and
    /// "index" that are meaningful in table titles.
    #[serde(default)]
    pub extended_stopwords: bool,

    /// Additional stopwords.
    #[serde(default)]
    pub custom_stopwords: Vec<String>,

    /// Index writer memory budget in bytes.
    #[serde(default = "default_writer_heap_bytes")]
    pub writer_heap_bytes: usize,

    /// Documents per commit when building from a catalogue.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_limit() -> usize {
    10
}

fn default_true() -> bool {
    true
}

fn default_writer_heap_bytes() -> usize {
    50_000_000
}

fn default_batch_size() -> usize {
    100
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            index_path: None,
            catalogue_path: None,
            default_operator: DefaultOperator::default(),
            default_limit: default_limit(),
            stopwords_enabled: default_true(),
            extended_stopwords: false,
            custom_stopwords: Vec::new(),
            writer_heap_bytes: default_writer_heap_bytes(),
            batch_size: default_batch_size(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
