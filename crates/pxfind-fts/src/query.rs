//! Query construction.
//!
//! Resolves the caller's field filter against the index schema and parses
//! query text into a tantivy query distributed over those fields.
//!
//! # Field Filters
//!
//! - empty or absent filter → the default search fields
//! - otherwise → comma-separated field names, empty segments dropped
//!
//! Names are not validated against the registry. Names the index does not
//! know, and stored-only fields, are skipped: they can never match. The same
//! holds for `field:value` clauses inside the query text.
//!
//! # Syntax
//!
//! The tantivy query grammar: bare terms combined by the default operator,
//! explicit `AND` / `OR` / `NOT`, `+term` / `-term`, `"phrase queries"`, and
//! `field:value`.

use pxfind_core::{Error, Result};
use tantivy::query::{EmptyQuery, Query, QueryParser, QueryParserError};
use tantivy::schema::Field;
use tantivy::Index;

use crate::schema::TableSchema;
use crate::types::DefaultOperator;

/// Split a field filter into field names.
///
/// Returns `None` when the filter selects the default fields.
pub fn split_field_filter(filter: Option<&str>) -> Option<Vec<&str>> {
    let filter = filter?.trim();
    if filter.is_empty() {
        return None;
    }

    let names: Vec<&str> = filter
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if names.is_empty() { None } else { Some(names) }
}

/// Resolve a field filter to searchable tantivy fields.
pub fn resolve_fields(schema: &TableSchema, filter: Option<&str>) -> Vec<Field> {
    let Some(names) = split_field_filter(filter) else {
        return schema.default_search_fields();
    };

    let tantivy_schema = schema.schema();
    let mut fields = Vec::with_capacity(names.len());
    for name in names {
        match tantivy_schema.get_field(name) {
            Ok(field) if tantivy_schema.get_field_entry(field).is_indexed() => {
                if !fields.contains(&field) {
                    fields.push(field);
                }
            }
            Ok(_) => log::debug!("Field '{name}' is not searchable, skipping"),
            Err(_) => log::debug!("Unknown field '{name}' in filter, skipping"),
        }
    }
    fields
}

/// Builder for multi-field queries.
pub struct QueryBuilder {
    operator: DefaultOperator,
}

/// Parsed query, or the knowledge that it cannot match anything.
pub enum BuiltQuery {
    /// A query to execute.
    Query(Box<dyn Query>),
    /// Nothing in the text can match: every clause was dropped or excluding.
    MatchesNothing,
}

impl QueryBuilder {
    /// Create a query builder with the given default operator.
    pub fn new(operator: DefaultOperator) -> Self {
        Self { operator }
    }

    /// Default operator used for implicit combination.
    pub fn operator(&self) -> DefaultOperator {
        self.operator
    }

    /// Parse query text over the given fields.
    ///
    /// Clauses naming a field the index does not have never match, and a
    /// query that keeps no positive clause (only stopwords, only exclusions)
    /// matches nothing.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedQuery` for empty text or a syntax error.
    pub fn build(&self, index: &Index, fields: Vec<Field>, text: &str) -> Result<BuiltQuery> {
        if text.trim().is_empty() {
            return Err(Error::malformed_query(text, "query text is empty"));
        }

        let mut parser = QueryParser::for_index(index, fields);
        if self.operator == DefaultOperator::And {
            parser.set_conjunction_by_default();
        }

        match parser.parse_query(text) {
            Ok(query) => return Ok(BuiltQuery::Query(query)),
            Err(e @ QueryParserError::SyntaxError(_)) => {
                return Err(Error::malformed_query(text, e.to_string()));
            }
            Err(_) => {}
        }

        let (query, errors) = parser.parse_query_lenient(text);
        let mut matches_nothing = false;
        for error in errors {
            match error {
                QueryParserError::FieldDoesNotExist(name) => {
                    log::debug!("Unknown field '{name}' in query, clause never matches");
                }
                QueryParserError::NoDefaultFieldDeclared => {
                    log::debug!("No searchable field selected for bare terms");
                }
                QueryParserError::AllButQueryForbidden => matches_nothing = true,
                other => return Err(Error::malformed_query(text, other.to_string())),
            }
        }

        if matches_nothing || (*query).is::<EmptyQuery>() {
            Ok(BuiltQuery::MatchesNothing)
        } else {
            Ok(BuiltQuery::Query(query))
        }
    }
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new(DefaultOperator::default())
    }
}

// ============================================================================
// Tests
// ============================================================================
