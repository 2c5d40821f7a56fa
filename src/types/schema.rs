//! Schema metadata as read from comment tables and introspection views.

use serde::Serialize;

/// A free-text annotation from `comment_on_table` or `comment_on_column`.
///
/// Rows without a column describe tables; rows with a column describe columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaComment {
    pub table_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl SchemaComment {
    /// A table-level comment row.
    pub fn table(table_name: &str, schema_name: Option<&str>, comment: Option<&str>) -> Self {
        Self {
            table_name: table_name.to_string(),
            column_name: None,
            schema_name: schema_name.map(str::to_string),
            comment: comment.map(str::to_string),
        }
    }

    /// A column-level comment row.
    pub fn column(table_name: &str, column_name: &str, comment: Option<&str>) -> Self {
        Self {
            table_name: table_name.to_string(),
            column_name: Some(column_name.to_string()),
            schema_name: None,
            comment: comment.map(str::to_string),
        }
    }
}

/// A column merged from comment rows and `information_schema.columns`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    pub table_name: String,
    pub column_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// A foreign-key edge. Matches if either endpoint is a candidate table,
/// but always renders from the referencing side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relationship {
    pub from_table: String,
    pub from_column: String,
    pub to_table: String,
    pub to_column: String,
}

impl Relationship {
    pub fn new(from_table: &str, from_column: &str, to_table: &str, to_column: &str) -> Self {
        Self {
            from_table: from_table.to_string(),
            from_column: from_column.to_string(),
            to_table: to_table.to_string(),
            to_column: to_column.to_string(),
        }
    }

    /// Whether either endpoint is one of `tables`.
    pub fn touches(&self, tables: &[String]) -> bool {
        tables.iter().any(|t| *t == self.from_table || *t == self.to_table)
    }
}

/// A candidate table with its selected columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableContext {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Number of distinct question keywords that hit this table
    pub score: usize,
    pub columns: Vec<ColumnDescriptor>,
}

/// Tables, columns and relationships selected for one question.
///
/// Rebuilt for every request and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchemaContext {
    pub tables: Vec<TableContext>,
    pub relationships: Vec<Relationship>,
    /// True when no table matched and the unranked fallback was used
    pub fallback: bool,
}

impl SchemaContext {
    pub fn table_names(&self) -> Vec<String> {
        self.tables.iter().map(|t| t.name.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
