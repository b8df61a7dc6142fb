//! Tantivy schema and field registry for table documents.
//!
//! Every field in the index is one entry of [`SchemaField`], and every entry
//! has exactly one [`FieldMode`]. The tantivy options for a field are derived
//! from its mode alone, so adding a field never needs per-field option code.
//!
//! # Field Modes
//!
//! | Mode | Stored | Indexed | Tokenized |
//! |------|--------|---------|-----------|
//! | `ExactStored` | yes | yes | no (raw token) |
//! | `IndexedStored` | yes | yes | yes |
//! | `IndexedOnly` | no | yes | yes |
//! | `StoredOnly` | yes | no | - |
//!
//! # Tokenizer
//!
//! Tokenized fields use the `px_standard` analyzer:
//! SimpleTokenizer → RemoveLongFilter(255) → LowerCaser → stopword filters
//! (see [`crate::stopwords`]).
//! The analyzer is not persisted with the index and must be registered on
//! every opened `Index` via [`TableSchema::register_tokenizers`].

use tantivy::schema::{
    Field, IndexRecordOption, Schema, SchemaBuilder, TextFieldIndexing, TextOptions, STORED,
    STRING,
};
use tantivy::tokenizer::{LowerCaser, RemoveLongFilter, SimpleTokenizer, TextAnalyzer};
use tantivy::Index;

use pxfind_core::{Error, Result};

use crate::stopwords::stopword_filters;
use crate::types::SearchConfig;

/// Schema version for freshness invalidation.
///
/// Increment this when fields change to force catalogue re-indexing.
pub const SCHEMA_VERSION: u32 = 1;

/// Name of the analyzer used by tokenized fields.
pub const TOKENIZER_NAME: &str = "px_standard";

/// Tokens longer than this are dropped.
const MAX_TOKEN_LEN: usize = 255;

/// Store/index behaviour of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMode {
    /// Stored verbatim and matched as a single raw token.
    ExactStored,
    /// Tokenized for search and stored.
    IndexedStored,
    /// Tokenized for search, not retrievable.
    IndexedOnly,
    /// Retrievable, not searchable.
    StoredOnly,
}

impl FieldMode {
    /// Tantivy options for this mode.
    pub fn options(self) -> TextOptions {
        let tokenized = TextFieldIndexing::default()
            .set_tokenizer(TOKENIZER_NAME)
            .set_index_option(IndexRecordOption::WithFreqsAndPositions);

        match self {
            FieldMode::ExactStored => STRING | STORED,
            FieldMode::IndexedStored => TextOptions::default()
                .set_indexing_options(tokenized)
                .set_stored(),
            FieldMode::IndexedOnly => TextOptions::default().set_indexing_options(tokenized),
            FieldMode::StoredOnly => STORED.into(),
        }
    }

    /// Whether the raw value is retrievable from a hit.
    pub fn is_stored(self) -> bool {
        !matches!(self, FieldMode::IndexedOnly)
    }

    /// Whether the field can be searched at all.
    pub fn is_indexed(self) -> bool {
        !matches!(self, FieldMode::StoredOnly)
    }

    /// Whether the field goes through the analyzer.
    pub fn is_tokenized(self) -> bool {
        matches!(self, FieldMode::IndexedStored | FieldMode::IndexedOnly)
    }
}

/// The fixed set of fields, in registry order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaField {
    /// Identity key used for update-by-id.
    DocId,
    /// Same value as the doc id, tokenized for search.
    SearchId,
    /// Navigation path.
    Path,
    /// Table name.
    Table,
    /// Database id.
    Database,
    /// Publication date in `yyyyMMdd HH:mm` form.
    Published,
    /// Matrix identifier.
    Matrix,
    /// Table title.
    Title,
    /// Space-joined variable names.
    Variables,
    /// Time period values.
    Period,
    /// All value texts.
    Values,
    /// All value codes.
    Codes,
    /// Grouping names.
    Groupings,
    /// Grouping ids.
    GroupingCodes,
    /// Value set names.
    Valuesets,
    /// Value set ids.
    ValuesetCodes,
    /// Table id, falling back to the matrix.
    TableId,
    /// Synonyms, present only when non-empty.
    Synonyms,
}

impl SchemaField {
    /// Every field in registry order.
    pub const ALL: [SchemaField; 18] = [
        SchemaField::DocId,
        SchemaField::SearchId,
        SchemaField::Path,
        SchemaField::Table,
        SchemaField::Database,
        SchemaField::Published,
        SchemaField::Matrix,
        SchemaField::Title,
        SchemaField::Variables,
        SchemaField::Period,
        SchemaField::Values,
        SchemaField::Codes,
        SchemaField::Groupings,
        SchemaField::GroupingCodes,
        SchemaField::Valuesets,
        SchemaField::ValuesetCodes,
        SchemaField::TableId,
        SchemaField::Synonyms,
    ];

    /// Field name in the index.
    pub fn name(self) -> &'static str {
        match self {
            SchemaField::DocId => "docid",
            SchemaField::SearchId => "searchid",
            SchemaField::Path => "path",
            SchemaField::Table => "table",
            SchemaField::Database => "database",
            SchemaField::Published => "published",
            SchemaField::Matrix => "matrix",
            SchemaField::Title => "title",
            SchemaField::Variables => "variables",
            SchemaField::Period => "period",
            SchemaField::Values => "values",
            SchemaField::Codes => "codes",
            SchemaField::Groupings => "groupings",
            SchemaField::GroupingCodes => "groupingcodes",
            SchemaField::Valuesets => "valuesets",
            SchemaField::ValuesetCodes => "valuesetcodes",
            SchemaField::TableId => "tableid",
            SchemaField::Synonyms => "synonyms",
        }
    }

    /// Store/index mode of the field.
    pub fn mode(self) -> FieldMode {
        match self {
            SchemaField::DocId | SchemaField::Database | SchemaField::Published => {
                FieldMode::ExactStored
            }
            SchemaField::Path | SchemaField::Table => FieldMode::StoredOnly,
            SchemaField::Matrix | SchemaField::Title | SchemaField::TableId => {
                FieldMode::IndexedStored
            }
            SchemaField::SearchId
            | SchemaField::Variables
            | SchemaField::Period
            | SchemaField::Values
            | SchemaField::Codes
            | SchemaField::Groupings
            | SchemaField::GroupingCodes
            | SchemaField::Valuesets
            | SchemaField::ValuesetCodes
            | SchemaField::Synonyms => FieldMode::IndexedOnly,
        }
    }

    /// Look up a field by its index name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }

    /// Fields searched when the caller gives no field filter.
    pub fn default_search_fields() -> impl Iterator<Item = SchemaField> {
        Self::ALL.into_iter().filter(|f| f.mode().is_tokenized())
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Tantivy schema with typed handles for every registry field.
#[derive(Clone)]
pub struct TableSchema {
    schema: Schema,
    fields: Vec<Field>,
}

impl TableSchema {
    /// Build the table schema from the registry.
    pub fn build() -> Self {
        let mut builder = SchemaBuilder::new();
        let fields = SchemaField::ALL
            .iter()
            .map(|f| builder.add_text_field(f.name(), f.mode().options()))
            .collect();

        Self {
            schema: builder.build(),
            fields,
        }
    }

    /// Resolve registry fields against the schema of an existing index.
    ///
    /// # Errors
    ///
    /// Returns `Error::Storage` if the index lacks a registry field.
    pub fn from_schema(schema: Schema) -> Result<Self> {
        let fields = SchemaField::ALL
            .iter()
            .map(|f| {
                schema.get_field(f.name()).map_err(|_| {
                    Error::storage(format!(
                        "index schema has no '{}' field; rebuild the index",
                        f.name()
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { schema, fields })
    }

    /// Get the underlying tantivy schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Tantivy handle for a registry field.
    pub fn field(&self, field: SchemaField) -> Field {
        self.fields[field.index()]
    }

    /// Handles of the default search fields, in registry order.
    pub fn default_search_fields(&self) -> Vec<Field> {
        SchemaField::default_search_fields()
            .map(|f| self.field(f))
            .collect()
    }

    /// Register the `px_standard` analyzer with an index.
    ///
    /// Must be called after creating or opening an index, before writing or
    /// parsing queries.
    pub fn register_tokenizers(index: &Index, config: &SearchConfig) {
        let mut builder = TextAnalyzer::builder(SimpleTokenizer::default())
            .filter(RemoveLongFilter::limit(MAX_TOKEN_LEN))
            .filter(LowerCaser)
            .dynamic();
        for filter in stopword_filters(config) {
            builder = builder.filter_dynamic(filter);
        }

        index.tokenizers().register(TOKENIZER_NAME, builder.build());
    }
}

impl std::fmt::Debug for TableSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableSchema")
            .field("field_count", &self.fields.len())
            .field("schema_version", &SCHEMA_VERSION)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
