//! Result envelopes returned by the agent.
//!
//! Failures are carried as data (`success: false` plus the error text) rather
//! than as `Err`, so callers can render them next to successful results.

use serde::Serialize;
use serde_json::{Map, Value};

/// One result row, keyed by column name in select-list order.
pub type Record = Map<String, Value>;

/// Output of SQL synthesis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedQuery {
    pub success: bool,
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Leading slice of the rendered schema context, for display
    #[serde(skip_serializing_if = "String::is_empty")]
    pub schema_context: String,
}

impl GeneratedQuery {
    pub fn ok(query: String, schema_context: String) -> Self {
        Self {
            success: true,
            query: Some(query),
            error: None,
            schema_context,
        }
    }

    pub fn failed(error: String) -> Self {
        Self {
            success: false,
            query: None,
            error: Some(error),
            schema_context: String::new(),
        }
    }
}

/// Output of query execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionResult {
    pub success: bool,
    pub data: Option<Vec<Record>>,
    pub columns: Vec<String>,
    pub row_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionResult {
    /// Zip column names onto value rows.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let data: Vec<Record> = rows
            .into_iter()
            .map(|row| columns.iter().cloned().zip(row).collect())
            .collect();
        Self {
            success: true,
            row_count: data.len(),
            data: Some(data),
            columns,
            error: None,
        }
    }

    pub fn failed(error: String) -> Self {
        Self {
            success: false,
            data: None,
            columns: Vec::new(),
            row_count: 0,
            error: Some(error),
        }
    }
}

/// Output of an EXPLAIN-based validity check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub message: String,
}
