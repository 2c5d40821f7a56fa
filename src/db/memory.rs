//! In-memory backend holding comment rows, introspected columns and
//! foreign keys, plus canned statement results.
//!
//! Lookup methods evaluate the same matching rules the PostgreSQL backend
//! expresses in SQL, so retrieval can be exercised without a server.

use std::collections::{BTreeMap, HashMap};

use super::backend::{DatabaseBackend, QueryResult};
use super::DbError;
use crate::retrieval::Keywords;
use crate::types::{ColumnDescriptor, Relationship, SchemaComment};

/// In-memory stand-in for a database with comment tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    table_comments: Vec<SchemaComment>,
    column_comments: Vec<SchemaComment>,
    /// Introspected columns in ordinal order (insertion order)
    columns: Vec<ColumnDescriptor>,
    foreign_keys: Vec<Relationship>,
    statements: HashMap<String, Result<QueryResult, String>>,
    /// When set, every metadata lookup fails with this message
    metadata_error: Option<String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `comment_on_table` row.
    pub fn comment_table(mut self, table: &str, comment: Option<&str>) -> Self {
        self.table_comments
            .push(SchemaComment::table(table, Some("public"), comment));
        self
    }

    /// Add a `comment_on_column` row.
    pub fn comment_column(mut self, table: &str, column: &str, comment: Option<&str>) -> Self {
        self.column_comments
            .push(SchemaComment::column(table, column, comment));
        self
    }

    /// Add an introspected column; call order is ordinal order.
    pub fn column(mut self, table: &str, column: &str, data_type: &str) -> Self {
        self.columns.push(ColumnDescriptor {
            table_name: table.to_string(),
            column_name: column.to_string(),
            data_type: Some(data_type.to_string()),
            comment: None,
        });
        self
    }

    pub fn foreign_key(
        mut self,
        from_table: &str,
        from_column: &str,
        to_table: &str,
        to_column: &str,
    ) -> Self {
        self.foreign_keys
            .push(Relationship::new(from_table, from_column, to_table, to_column));
        self
    }

    /// Register the result `run_query` returns for an exact statement.
    pub fn statement(mut self, sql: &str, result: QueryResult) -> Self {
        self.statements.insert(sql.trim().to_string(), Ok(result));
        self
    }

    /// Register an error `run_query` and `explain` return for a statement.
    pub fn failing_statement(mut self, sql: &str, message: &str) -> Self {
        self.statements
            .insert(sql.trim().to_string(), Err(message.to_string()));
        self
    }

    /// Make every metadata lookup fail, as if the comment tables were missing.
    pub fn failing_metadata(mut self, message: &str) -> Self {
        self.metadata_error = Some(message.to_string());
        self
    }

    fn check_metadata(&self) -> Result<(), DbError> {
        match &self.metadata_error {
            Some(message) => Err(DbError::query(message.clone())),
            None => Ok(()),
        }
    }

    fn data_type_of(&self, table: &str, column: &str) -> Option<String> {
        self.columns
            .iter()
            .find(|c| c.table_name == table && c.column_name == column)
            .and_then(|c| c.data_type.clone())
    }

    fn lookup(&self, sql: &str) -> Result<&QueryResult, DbError> {
        match self.statements.get(sql.trim()) {
            Some(Ok(result)) => Ok(result),
            Some(Err(message)) => Err(DbError::query(message.clone())),
            None => Err(DbError::query(format!(
                "ERROR: no result registered for statement: {}",
                sql
            ))),
        }
    }
}

impl DatabaseBackend for MemoryBackend {
    fn backend_name(&self) -> &'static str {
        "Memory"
    }

    fn table_comments_matching(
        &mut self,
        keywords: &Keywords,
    ) -> Result<Vec<SchemaComment>, DbError> {
        self.check_metadata()?;
        let mut rows: Vec<SchemaComment> = self
            .table_comments
            .iter()
            .filter(|row| keywords.matches(&row.table_name, row.comment.as_deref()))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.table_name.cmp(&b.table_name));
        Ok(rows)
    }

    fn commented_tables(&mut self, limit: usize) -> Result<Vec<SchemaComment>, DbError> {
        self.check_metadata()?;
        // first row per table, like DISTINCT ON (table_name)
        let mut by_name: BTreeMap<&str, &SchemaComment> = BTreeMap::new();
        for row in &self.table_comments {
            by_name.entry(row.table_name.as_str()).or_insert(row);
        }
        Ok(by_name.into_values().take(limit).cloned().collect())
    }

    fn column_comments_matching(
        &mut self,
        table: &str,
        keywords: &Keywords,
        limit: usize,
    ) -> Result<Vec<ColumnDescriptor>, DbError> {
        self.check_metadata()?;
        let mut rows: Vec<ColumnDescriptor> = self
            .column_comments
            .iter()
            .filter(|row| row.table_name == table)
            .filter_map(|row| {
                let column = row.column_name.as_deref()?;
                keywords
                    .matches(column, row.comment.as_deref())
                    .then(|| ColumnDescriptor {
                        table_name: row.table_name.clone(),
                        column_name: column.to_string(),
                        data_type: self.data_type_of(table, column),
                        comment: row.comment.clone(),
                    })
            })
            .collect();
        rows.sort_by(|a, b| a.column_name.cmp(&b.column_name));
        rows.truncate(limit);
        Ok(rows)
    }

    fn introspect_columns(
        &mut self,
        table: &str,
        _schema: Option<&str>,
        limit: usize,
    ) -> Result<Vec<ColumnDescriptor>, DbError> {
        self.check_metadata()?;
        Ok(self
            .columns
            .iter()
            .filter(|c| c.table_name == table)
            .take(limit)
            .cloned()
            .collect())
    }

    fn foreign_keys(
        &mut self,
        tables: &[String],
        limit: usize,
    ) -> Result<Vec<Relationship>, DbError> {
        self.check_metadata()?;
        let mut rows: Vec<Relationship> = self
            .foreign_keys
            .iter()
            .filter(|fk| fk.touches(tables))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            (a.from_table.as_str(), a.from_column.as_str())
                .cmp(&(b.from_table.as_str(), b.from_column.as_str()))
        });
        rows.truncate(limit);
        Ok(rows)
    }

    fn run_query(&mut self, sql: &str) -> Result<QueryResult, DbError> {
        self.lookup(sql).cloned()
    }

    fn explain(&mut self, sql: &str) -> Result<Vec<String>, DbError> {
        self.lookup(sql)
            .map(|_| vec!["Result  (cost=0.00..0.01 rows=1 width=0)".to_string()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_commented_tables_distinct_and_sorted() {
        let mut db = MemoryBackend::new()
            .comment_table("zone", Some("zones"))
            .comment_table("area", Some("areas"))
            .comment_table("area", Some("duplicate row"));
        let rows = db.commented_tables(10).unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.table_name.as_str()).collect();
        assert_eq!(names, vec!["area", "zone"]);
        assert_eq!(rows[0].comment.as_deref(), Some("areas"));
    }

    #[rstest]
    fn test_column_matches_pick_up_data_type() {
        let mut db = MemoryBackend::new()
            .column("district", "population", "bigint")
            .comment_column("district", "population", Some("people counted"));
        let kw = Keywords::from_question("population");
        let cols = db.column_comments_matching("district", &kw, 15).unwrap();
        assert_eq!(cols.len(), 1);
        assert_eq!(cols[0].data_type.as_deref(), Some("bigint"));
    }

    #[rstest]
    fn test_failing_metadata() {
        let mut db = MemoryBackend::new()
            .comment_table("area", Some("areas"))
            .failing_metadata("ERROR: relation \"public.comment_on_table\" does not exist");
        let err = db.commented_tables(5).unwrap_err();
        assert!(err.to_string().contains("comment_on_table"));
    }

    #[rstest]
    fn test_unregistered_statement_fails() {
        let mut db = MemoryBackend::new();
        assert!(db.run_query("SELECT 1").is_err());
        assert!(db.explain("SELECT 1").is_err());
    }
}
