//! PostgreSQL backend implementation.
//!
//! This module provides a database backend over one blocking
//! `postgres::Client`, opened at construction and held for the backend's
//! lifetime. There is no pooling and no reconnect; a dropped connection
//! means building a new backend.

mod conversion;
pub mod queries;

use postgres::types::{ToSql, Type};
use postgres::{Client, NoTls, Row, SimpleQueryMessage};
use tracing::debug;

use super::backend::{DatabaseBackend, QueryResult};
use super::DbError;
use crate::config::DatabaseSettings;
use crate::retrieval::Keywords;
use crate::types::{ColumnDescriptor, Relationship, SchemaComment};

pub use conversion::text_to_json;

/// PostgreSQL backend holding a single connection.
pub struct PostgresBackend {
    client: Client,
    /// Schema that holds `comment_on_table` and `comment_on_column`
    comment_schema: String,
}

impl PostgresBackend {
    /// Connect using the database settings.
    ///
    /// # Errors
    /// Returns `DbError::ConnectFailed` if the connection string cannot be
    /// parsed or the server is unreachable.
    pub fn connect(settings: &DatabaseSettings) -> Result<Self, DbError> {
        let target = settings.describe();
        let config = settings
            .to_pg_config()
            .map_err(|message| DbError::ConnectFailed {
                target: target.clone(),
                message,
            })?;

        let client = config.connect(NoTls).map_err(|e| DbError::ConnectFailed {
            target: target.clone(),
            message: describe(&e),
        })?;
        debug!(database = %target, "connected to PostgreSQL");

        Ok(Self::from_client(client, &settings.schema))
    }

    /// Wrap an existing client.
    pub fn from_client(client: Client, comment_schema: &str) -> Self {
        Self {
            client,
            comment_schema: comment_schema.to_string(),
        }
    }

    fn query_rows(
        &mut self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, DbError> {
        debug!(sql, "metadata query");
        Ok(self.client.query(sql, params)?)
    }
}

/// Error text for a `postgres::Error`, preferring the server's own message.
pub fn describe(err: &postgres::Error) -> String {
    match err.as_db_error() {
        Some(db) => format!("{}: {}", db.severity(), db.message()),
        None => err.to_string(),
    }
}

impl From<postgres::Error> for DbError {
    fn from(err: postgres::Error) -> Self {
        DbError::query(describe(&err))
    }
}

fn get_text(row: &Row, idx: usize) -> Result<String, DbError> {
    Ok(row.try_get::<_, Option<String>>(idx)?.unwrap_or_default())
}

fn get_opt_text(row: &Row, idx: usize) -> Result<Option<String>, DbError> {
    Ok(row.try_get::<_, Option<String>>(idx)?)
}

fn as_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

fn table_comment_from_row(row: &Row) -> Result<SchemaComment, DbError> {
    Ok(SchemaComment {
        table_name: get_text(row, 0)?,
        column_name: None,
        schema_name: get_opt_text(row, 1)?,
        comment: get_opt_text(row, 2)?,
    })
}

impl DatabaseBackend for PostgresBackend {
    fn backend_name(&self) -> &'static str {
        "Postgres"
    }

    fn table_comments_matching(
        &mut self,
        keywords: &Keywords,
    ) -> Result<Vec<SchemaComment>, DbError> {
        let sql = queries::table_comments_matching(&self.comment_schema);
        let patterns = keywords.patterns();
        let tokens = keywords.tokens();
        self.query_rows(&sql, &[&patterns, &tokens])?
            .iter()
            .map(table_comment_from_row)
            .collect()
    }

    fn commented_tables(&mut self, limit: usize) -> Result<Vec<SchemaComment>, DbError> {
        let sql = queries::commented_tables(&self.comment_schema);
        self.query_rows(&sql, &[&as_limit(limit)])?
            .iter()
            .map(table_comment_from_row)
            .collect()
    }

    fn column_comments_matching(
        &mut self,
        table: &str,
        keywords: &Keywords,
        limit: usize,
    ) -> Result<Vec<ColumnDescriptor>, DbError> {
        let sql = queries::column_comments_matching(&self.comment_schema);
        let patterns = keywords.patterns();
        let tokens = keywords.tokens();
        self.query_rows(&sql, &[&table, &patterns, &tokens, &as_limit(limit)])?
            .iter()
            .map(|row| {
                Ok(ColumnDescriptor {
                    table_name: table.to_string(),
                    column_name: get_text(row, 0)?,
                    comment: get_opt_text(row, 1)?,
                    data_type: get_opt_text(row, 2)?,
                })
            })
            .collect()
    }

    fn introspect_columns(
        &mut self,
        table: &str,
        schema: Option<&str>,
        limit: usize,
    ) -> Result<Vec<ColumnDescriptor>, DbError> {
        self.query_rows(queries::INTROSPECT_COLUMNS, &[&table, &schema, &as_limit(limit)])?
            .iter()
            .map(|row| {
                Ok(ColumnDescriptor {
                    table_name: table.to_string(),
                    column_name: get_text(row, 0)?,
                    data_type: get_opt_text(row, 1)?,
                    comment: None,
                })
            })
            .collect()
    }

    fn foreign_keys(
        &mut self,
        tables: &[String],
        limit: usize,
    ) -> Result<Vec<Relationship>, DbError> {
        let tables = tables.to_vec();
        self.query_rows(queries::FOREIGN_KEYS, &[&tables, &as_limit(limit)])?
            .iter()
            .map(|row| {
                Ok(Relationship {
                    from_table: get_text(row, 0)?,
                    from_column: get_text(row, 1)?,
                    to_table: get_text(row, 2)?,
                    to_column: get_text(row, 3)?,
                })
            })
            .collect()
    }

    fn run_query(&mut self, sql: &str) -> Result<QueryResult, DbError> {
        // Preparing first yields column names and types even for empty
        // results, and rejects multi-statement input.
        let statement = self.client.prepare(sql)?;
        let columns: Vec<(String, Type)> = statement
            .columns()
            .iter()
            .map(|c| (c.name().to_string(), c.type_().clone()))
            .collect();

        let mut rows = Vec::new();
        for message in self.client.simple_query(sql)? {
            if let SimpleQueryMessage::Row(row) = message {
                let mut values = Vec::with_capacity(columns.len());
                for (idx, (_, ty)) in columns.iter().enumerate() {
                    values.push(text_to_json(ty, row.try_get(idx)?));
                }
                rows.push(values);
            }
        }

        Ok(QueryResult {
            headers: columns.into_iter().map(|(name, _)| name).collect(),
            rows,
        })
    }

    fn explain(&mut self, sql: &str) -> Result<Vec<String>, DbError> {
        // Extended protocol: a single statement only, so nothing trailing
        // the planned query is ever executed.
        self.client
            .query(&format!("EXPLAIN {}", sql), &[])?
            .iter()
            .map(|row| get_text(row, 0))
            .collect()
    }
}
