//! Table document construction.
//!
//! A [`TableDocument`] is the ordered list of field values the indexer writes
//! for one table. It is built from a [`TableRecord`] (where the table lives in
//! the catalogue) and the table's [`TableMetadata`].
//!
//! # Completeness
//!
//! A document is only built when the record has a path, table, and database,
//! and the metadata has a title, a matrix, and at least one variable.
//! Otherwise [`TableDocument::build`] returns an empty document; the indexer
//! refuses to write empty documents.

use chrono::NaiveDateTime;
use pxfind_core::date::to_px_date;
use pxfind_core::TableMetadata;
use serde::{Deserialize, Serialize};
use tantivy::TantivyDocument;

use crate::schema::{SchemaField, TableSchema};

/// Catalogue location and identity of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRecord {
    /// Database id.
    pub database: String,
    /// Document id; the key for updates.
    pub id: String,
    /// Navigation path within the database.
    pub path: String,
    /// Table name.
    pub table: String,
    /// Title to index and return in hits.
    pub title: String,
    /// Publication date.
    pub published: NaiveDateTime,
}

impl TableRecord {
    /// Create a record.
    pub fn new(
        database: impl Into<String>,
        id: impl Into<String>,
        path: impl Into<String>,
        table: impl Into<String>,
        title: impl Into<String>,
        published: NaiveDateTime,
    ) -> Self {
        Self {
            database: database.into(),
            id: id.into(),
            path: path.into(),
            table: table.into(),
            title: title.into(),
            published,
        }
    }
}

/// Field values of one table, in registry order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableDocument {
    fields: Vec<(SchemaField, String)>,
}

impl TableDocument {
    /// Build the document for a table.
    ///
    /// Returns an empty document when [`incomplete_reason`] reports a
    /// missing precondition.
    pub fn build<M>(record: &TableRecord, meta: &M) -> Self
    where
        M: TableMetadata + ?Sized,
    {
        if incomplete_reason(record, meta).is_some() {
            return Self::default();
        }

        let table_id = meta.table_id().unwrap_or_else(|| meta.matrix());

        let mut fields = vec![
            (SchemaField::DocId, record.id.clone()),
            (SchemaField::SearchId, record.id.clone()),
            (SchemaField::Path, record.path.clone()),
            (SchemaField::Table, record.table.clone()),
            (SchemaField::Database, record.database.clone()),
            (SchemaField::Published, to_px_date(&record.published)),
            (SchemaField::Matrix, meta.matrix().to_string()),
            (SchemaField::Title, record.title.clone()),
            (SchemaField::Variables, meta.variable_names().join(" ")),
            (SchemaField::Period, meta.time_values()),
            (SchemaField::Values, meta.all_values()),
            (SchemaField::Codes, meta.all_codes()),
            (SchemaField::Groupings, meta.all_groupings()),
            (SchemaField::GroupingCodes, meta.all_grouping_codes()),
            (SchemaField::Valuesets, meta.all_valuesets()),
            (SchemaField::ValuesetCodes, meta.all_valueset_codes()),
            (SchemaField::TableId, table_id.to_string()),
        ];

        if !meta.synonyms().is_empty() {
            fields.push((SchemaField::Synonyms, meta.synonyms().to_string()));
        }

        Self { fields }
    }

    /// Returns `true` if the document has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields present.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Value of a field, if present.
    pub fn get(&self, field: SchemaField) -> Option<&str> {
        self.fields
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v.as_str())
    }

    /// The document id, if the document is non-empty.
    pub fn doc_id(&self) -> Option<&str> {
        self.get(SchemaField::DocId)
    }

    /// Iterate over `(field, value)` pairs in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (SchemaField, &str)> {
        self.fields.iter().map(|(f, v)| (*f, v.as_str()))
    }

    /// Convert to a tantivy document for the given schema.
    pub fn to_tantivy(&self, schema: &TableSchema) -> TantivyDocument {
        let mut doc = TantivyDocument::new();
        for (field, value) in self.iter() {
            doc.add_text(schema.field(field), value);
        }
        doc
    }
}

/// Describe why a record/metadata pair cannot be indexed, if it cannot.
pub fn incomplete_reason<M>(record: &TableRecord, meta: &M) -> Option<&'static str>
where
    M: TableMetadata + ?Sized,
{
    if record.path.is_empty() {
        Some("empty path")
    } else if record.table.is_empty() {
        Some("empty table")
    } else if record.database.is_empty() {
        Some("empty database")
    } else if meta.title().is_empty() {
        Some("metadata has no title")
    } else if meta.matrix().is_empty() {
        Some("metadata has no matrix")
    } else if meta.variable_names().is_empty() {
        Some("metadata has no variables")
    } else {
        None
    }
}

// ============================================================================
// Tests
// ============================================================================
