//! Database backend trait for abstracting metadata lookups and execution.

use serde_json::Value;

use super::DbError;
use crate::retrieval::Keywords;
use crate::types::{ColumnDescriptor, Relationship, SchemaComment};

/// Result of a query execution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// Trait for databases the agent can search and query.
///
/// The lookup methods mirror the steps of relevance selection; every
/// implementation must apply the same any-token matching rules defined in
/// [`Keywords`] so ranking and supplementation behave identically.
pub trait DatabaseBackend {
    /// Get the backend name for logging/debugging.
    fn backend_name(&self) -> &'static str;

    /// Table comment rows whose comment or table name any keyword hits.
    ///
    /// Uncapped: the selector groups, ranks and truncates.
    fn table_comments_matching(
        &mut self,
        keywords: &Keywords,
    ) -> Result<Vec<SchemaComment>, DbError>;

    /// The first `limit` distinct commented tables in name order.
    fn commented_tables(&mut self, limit: usize) -> Result<Vec<SchemaComment>, DbError>;

    /// Commented columns of `table` whose comment or name any keyword hits,
    /// ordered by column name.
    fn column_comments_matching(
        &mut self,
        table: &str,
        keywords: &Keywords,
        limit: usize,
    ) -> Result<Vec<ColumnDescriptor>, DbError>;

    /// Columns of `table` from introspection, in ordinal order.
    fn introspect_columns(
        &mut self,
        table: &str,
        schema: Option<&str>,
        limit: usize,
    ) -> Result<Vec<ColumnDescriptor>, DbError>;

    /// Foreign keys with either endpoint in `tables`, ordered by
    /// `(from_table, from_column)`.
    fn foreign_keys(
        &mut self,
        tables: &[String],
        limit: usize,
    ) -> Result<Vec<Relationship>, DbError>;

    /// Run a statement and materialize every row.
    fn run_query(&mut self, sql: &str) -> Result<QueryResult, DbError>;

    /// Return the textual plan for a statement without running it.
    fn explain(&mut self, sql: &str) -> Result<Vec<String>, DbError>;
}
