//! Table metadata model.
//!
//! [`TableMetadata`] is the read-only view the indexer projects into a search
//! document. [`TableMeta`] is the concrete, serde-friendly implementation used
//! by the catalogue loader and in tests; other metadata sources can implement
//! the trait directly.
//!
//! All `all_*` projections are space-joined, deterministic, and follow
//! variable order, then value/classification order within each variable.

use serde::{Deserialize, Serialize};

/// Read-only projection of a table's metadata.
pub trait TableMetadata {
    /// Table title.
    fn title(&self) -> &str;

    /// Matrix identifier.
    fn matrix(&self) -> &str;

    /// Variable names in table order.
    fn variable_names(&self) -> Vec<&str>;

    /// Explicit table id, if the table declares one.
    fn table_id(&self) -> Option<&str>;

    /// Synonyms text; empty when the table has none.
    fn synonyms(&self) -> &str;

    /// Value texts of the time variable(s).
    fn time_values(&self) -> String;

    /// Value texts of every variable.
    fn all_values(&self) -> String;

    /// Value codes of every variable.
    fn all_codes(&self) -> String;

    /// Grouping names of every variable.
    fn all_groupings(&self) -> String;

    /// Grouping ids of every variable.
    fn all_grouping_codes(&self) -> String;

    /// Value set names of every variable.
    fn all_valuesets(&self) -> String;

    /// Value set ids of every variable.
    fn all_valueset_codes(&self) -> String;
}

/// A single value of a variable.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VariableValue {
    /// Value code.
    pub code: String,
    /// Display text.
    pub text: String,
}

/// A named classification attached to a variable (grouping or value set).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Classification {
    /// Classification id.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// A table variable (dimension).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Variable {
    /// Variable name.
    pub name: String,
    /// Variable code.
    #[serde(default)]
    pub code: String,
    /// Whether this is the time dimension.
    #[serde(default)]
    pub is_time: bool,
    /// Values in presentation order.
    #[serde(default)]
    pub values: Vec<VariableValue>,
    /// Available groupings.
    #[serde(default)]
    pub groupings: Vec<Classification>,
    /// Available value sets.
    #[serde(default)]
    pub valuesets: Vec<Classification>,
}

impl Variable {
    /// Create a variable with the given name and code.
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            ..Default::default()
        }
    }

    /// Mark this variable as the time dimension.
    pub fn time(mut self) -> Self {
        self.is_time = true;
        self
    }

    /// Append a value.
    pub fn value(mut self, code: impl Into<String>, text: impl Into<String>) -> Self {
        self.values.push(VariableValue {
            code: code.into(),
            text: text.into(),
        });
        self
    }

    /// Append a grouping.
    pub fn grouping(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.groupings.push(Classification {
            id: id.into(),
            name: name.into(),
        });
        self
    }

    /// Append a value set.
    pub fn valueset(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.valuesets.push(Classification {
            id: id.into(),
            name: name.into(),
        });
        self
    }
}

/// Concrete table metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableMeta {
    /// Table title.
    pub title: String,
    /// Matrix identifier.
    pub matrix: String,
    /// Explicit table id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,
    /// Synonyms text.
    #[serde(default)]
    pub synonyms: String,
    /// Variables in table order.
    #[serde(default)]
    pub variables: Vec<Variable>,
}

impl TableMeta {
    /// Create metadata with a title and matrix and no variables.
    pub fn new(title: impl Into<String>, matrix: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            matrix: matrix.into(),
            ..Default::default()
        }
    }

    /// Set the explicit table id.
    pub fn with_table_id(mut self, table_id: impl Into<String>) -> Self {
        self.table_id = Some(table_id.into());
        self
    }

    /// Set the synonyms text.
    pub fn with_synonyms(mut self, synonyms: impl Into<String>) -> Self {
        self.synonyms = synonyms.into();
        self
    }

    /// Append a variable.
    pub fn with_variable(mut self, variable: Variable) -> Self {
        self.variables.push(variable);
        self
    }

    fn join_values<'a, F, I>(&'a self, project: F) -> String
    where
        F: Fn(&'a Variable) -> I,
        I: Iterator<Item = &'a str>,
    {
        self.variables
            .iter()
            .flat_map(project)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl TableMetadata for TableMeta {
    fn title(&self) -> &str {
        &self.title
    }

    fn matrix(&self) -> &str {
        &self.matrix
    }

    fn variable_names(&self) -> Vec<&str> {
        self.variables.iter().map(|v| v.name.as_str()).collect()
    }

    fn table_id(&self) -> Option<&str> {
        self.table_id.as_deref()
    }

    fn synonyms(&self) -> &str {
        &self.synonyms
    }

    fn time_values(&self) -> String {
        self.variables
            .iter()
            .filter(|v| v.is_time)
            .flat_map(|v| v.values.iter().map(|val| val.text.as_str()))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn all_values(&self) -> String {
        self.join_values(|v| v.values.iter().map(|val| val.text.as_str()))
    }

    fn all_codes(&self) -> String {
        self.join_values(|v| v.values.iter().map(|val| val.code.as_str()))
    }

    fn all_groupings(&self) -> String {
        self.join_values(|v| v.groupings.iter().map(|g| g.name.as_str()))
    }

    fn all_grouping_codes(&self) -> String {
        self.join_values(|v| v.groupings.iter().map(|g| g.id.as_str()))
    }

    fn all_valuesets(&self) -> String {
        self.join_values(|v| v.valuesets.iter().map(|vs| vs.name.as_str()))
    }

    fn all_valueset_codes(&self) -> String {
        self.join_values(|v| v.valuesets.iter().map(|vs| vs.id.as_str()))
    }
}
