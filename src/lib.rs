//! query_agent library - natural-language questions to SQL
//!
//! Retrieves the slice of a PostgreSQL schema relevant to a question from
//! comment tables, asks a chat-completion model for SQL, and runs or checks
//! that SQL against the same database.

pub mod agent;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod llm;
pub mod output;
pub mod retrieval;
pub mod synth;
pub mod types;

#[macro_use]
pub mod test_macros;

#[cfg(test)]
pub mod test_utils;
