//! Shared test utilities for unit, execute and output tests.
//!
//! Provides canned in-memory databases and a completion client that replays
//! scripted answers while recording what it was asked.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::agent::QueryAgent;
use crate::config::RetrievalSettings;
use crate::db::MemoryBackend;
use crate::llm::{ChatMessage, CompletionClient, LlmError};

/// Catchments, countries and districts with one foreign key each way into
/// `country`.
///
/// Only `catchment.area_km2` carries a column comment, so most questions
/// about catchments get topped up from introspection.
pub fn catchment_db() -> MemoryBackend {
    MemoryBackend::new()
        .comment_table("catchment", Some("catchment boundaries by country"))
        .comment_table("country", Some("countries of the world"))
        .comment_table("district", Some("administrative districts with population"))
        .comment_column("catchment", "area_km2", Some("surface area in square kilometres"))
        .comment_column("district", "population", Some("people counted in the last census"))
        .column("catchment", "id", "integer")
        .column("catchment", "catchment_name", "text")
        .column("catchment", "country_id", "integer")
        .column("catchment", "area_km2", "numeric")
        .column("country", "id", "integer")
        .column("country", "name", "text")
        .column("district", "id", "integer")
        .column("district", "district_name", "text")
        .column("district", "country_id", "integer")
        .column("district", "population", "bigint")
        .foreign_key("catchment", "country_id", "country", "id")
        .foreign_key("district", "country_id", "country", "id")
}

/// `n_tables` tables named `metric_00..`, each with `n_cols` commented and
/// introspected columns named `value_00..`.
pub fn wide_db(n_tables: usize, n_cols: usize) -> MemoryBackend {
    let mut db = MemoryBackend::new();
    for i in 0..n_tables {
        let table = format!("metric_{i:02}");
        db = db.comment_table(&table, Some(&format!("metric table {i}")));
        for j in 0..n_cols {
            let column = format!("value_{j:02}");
            db = db
                .comment_column(&table, &column, Some(&format!("metric value {j}")))
                .column(&table, &column, "numeric");
        }
    }
    db
}

pub type RequestLog = Rc<RefCell<Vec<Vec<ChatMessage>>>>;

/// Completion client that pops pre-scripted replies in order.
///
/// Running out of replies yields a transport error.
pub struct ScriptedCompletion {
    replies: RefCell<VecDeque<Result<String, LlmError>>>,
    requests: RequestLog,
}

impl ScriptedCompletion {
    pub fn new(replies: Vec<Result<String, LlmError>>) -> Self {
        Self {
            replies: RefCell::new(replies.into()),
            requests: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn replying(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(t.to_string())).collect())
    }

    /// Snapshot of every message list received so far.
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.borrow().clone()
    }

    /// Shared handle to the request log, usable after the client is boxed.
    pub fn request_log(&self) -> RequestLog {
        Rc::clone(&self.requests)
    }
}

impl CompletionClient for ScriptedCompletion {
    fn model(&self) -> &str {
        "scripted"
    }

    fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        self.requests.borrow_mut().push(messages.to_vec());
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::Transport("no scripted reply left".to_string())))
    }
}

/// Agent over an in-memory database with default retrieval settings.
pub fn test_agent(db: MemoryBackend, llm: ScriptedCompletion) -> QueryAgent {
    QueryAgent::new(Box::new(db), Box::new(llm), &RetrievalSettings::default())
}
