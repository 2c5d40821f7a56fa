//! Shared types for schema metadata and agent results.

mod results;
mod schema;

pub use results::{ExecutionResult, GeneratedQuery, Record, ValidationResult};
pub use schema::{ColumnDescriptor, Relationship, SchemaComment, SchemaContext, TableContext};
