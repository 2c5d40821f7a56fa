//! Metadata and query access for the target database.
//!
//! This module provides the database layer for the agent:
//! - The `DatabaseBackend` trait covering comment-table lookups,
//!   introspection, query execution and EXPLAIN
//! - A PostgreSQL implementation over a single blocking connection
//! - An in-memory implementation used by tests
//!
//! # Comment tables
//!
//! Administrators describe tables and columns in two metadata tables,
//! `<schema>.comment_on_table` and `<schema>.comment_on_column`. These act as
//! a lightweight search index: the relevance selector matches question
//! keywords against them before falling back to `information_schema`.
//!
//! # Type Decisions
//!
//! **Why `&mut self` on every backend method?**
//! `postgres::Client` needs mutable access for every round-trip and the agent
//! is single-threaded, so the borrow checker stands in for a lock.
//!
//! **Why `serde_json::Value` for result cells?**
//! Results are handed straight to JSON/toon output and table rendering;
//! a JSON value covers every PostgreSQL type we convert without a bespoke
//! value enum.

mod backend;
mod escape;
mod memory;
pub mod postgres;

pub use backend::{DatabaseBackend, QueryResult};
pub use escape::quote_identifier;
pub use memory::MemoryBackend;
pub use postgres::PostgresBackend;

use thiserror::Error;

/// Database error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DbError {
    #[error("Failed to connect to database '{target}': {message}")]
    ConnectFailed { target: String, message: String },

    #[error("{message}")]
    QueryFailed { message: String },
}

impl DbError {
    pub fn query(message: impl Into<String>) -> Self {
        Self::QueryFailed {
            message: message.into(),
        }
    }
}
