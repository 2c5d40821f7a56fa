//! Candidate table and column selection.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::Keywords;
use crate::db::{DatabaseBackend, DbError};
use crate::types::{ColumnDescriptor, SchemaComment, SchemaContext, TableContext};

/// Hard ceiling on candidate tables per context.
pub const MAX_TABLES: usize = 10;
/// Hard ceiling on columns per candidate table.
pub const MAX_COLUMNS: usize = 15;
/// Hard ceiling on relationships per context.
pub const MAX_RELATIONSHIPS: usize = 10;

/// Bounds applied during selection.
///
/// Values above the hard ceilings are clamped down, so configuration can
/// shrink the prompt but never grow it past the defaults. Zero table and
/// column bounds are raised to 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalLimits {
    pub max_tables: usize,
    pub max_columns: usize,
    /// Below this many matched columns a table is topped up from introspection
    pub min_matched_columns: usize,
    pub introspection_limit: usize,
    /// Tables taken when no keyword matched anything
    pub fallback_tables: usize,
    pub max_relationships: usize,
}

impl Default for RetrievalLimits {
    fn default() -> Self {
        Self {
            max_tables: MAX_TABLES,
            max_columns: MAX_COLUMNS,
            min_matched_columns: 3,
            introspection_limit: 20,
            fallback_tables: 5,
            max_relationships: MAX_RELATIONSHIPS,
        }
    }
}

impl RetrievalLimits {
    /// Pull every bound into range. Table and column bounds stay at least
    /// 1 so a context is never emptied by configuration alone.
    pub fn clamped(self) -> Self {
        Self {
            max_tables: self.max_tables.clamp(1, MAX_TABLES),
            max_columns: self.max_columns.clamp(1, MAX_COLUMNS),
            fallback_tables: self.fallback_tables.clamp(1, MAX_TABLES),
            max_relationships: self.max_relationships.min(MAX_RELATIONSHIPS),
            ..self
        }
    }
}

/// Picks the tables, columns and relationships relevant to a question.
#[derive(Debug, Clone, Default)]
pub struct RelevanceSelector {
    limits: RetrievalLimits,
}

impl RelevanceSelector {
    pub fn new(limits: RetrievalLimits) -> Self {
        Self {
            limits: limits.clamped(),
        }
    }

    pub fn limits(&self) -> &RetrievalLimits {
        &self.limits
    }

    /// Build the schema context for a question.
    ///
    /// Never returns an empty table list while any commented table exists:
    /// when no keyword hits, the first commented tables are used instead.
    pub fn select(
        &self,
        db: &mut dyn DatabaseBackend,
        question: &str,
    ) -> Result<SchemaContext, DbError> {
        let keywords = Keywords::from_question(question);
        debug!(patterns = ?keywords.patterns(), backend = db.backend_name(), "searching comment tables");

        let mut tables = if keywords.is_empty() {
            Vec::new()
        } else {
            rank_tables(db.table_comments_matching(&keywords)?, &keywords, self.limits.max_tables)
        };

        let fallback = tables.is_empty();
        if fallback {
            warn!(question, "no table matched the question, using unranked fallback");
            let rows = db.commented_tables(self.limits.fallback_tables)?;
            tables = rank_tables(rows, &keywords, self.limits.max_tables);
        }

        for table in &mut tables {
            table.columns = self.select_columns(db, table, &keywords)?;
        }

        let relationships = if tables.is_empty() {
            Vec::new()
        } else {
            let names: Vec<String> = tables.iter().map(|t| t.name.clone()).collect();
            let mut relationships = db.foreign_keys(&names, self.limits.max_relationships)?;
            relationships.truncate(self.limits.max_relationships);
            relationships
        };

        info!(
            tables = tables.len(),
            relationships = relationships.len(),
            fallback,
            "selected schema context"
        );

        Ok(SchemaContext {
            tables,
            relationships,
            fallback,
        })
    }

    /// Keyword-matched columns, topped up from introspection when sparse.
    fn select_columns(
        &self,
        db: &mut dyn DatabaseBackend,
        table: &TableContext,
        keywords: &Keywords,
    ) -> Result<Vec<ColumnDescriptor>, DbError> {
        let mut columns: Vec<ColumnDescriptor> = Vec::new();
        if !keywords.is_empty() {
            for column in db.column_comments_matching(&table.name, keywords, self.limits.max_columns)? {
                push_unique(&mut columns, column);
            }
        }

        if columns.len() < self.limits.min_matched_columns {
            debug!(
                table = %table.name,
                matched = columns.len(),
                "supplementing columns from introspection"
            );
            let introspected = db.introspect_columns(
                &table.name,
                table.schema.as_deref(),
                self.limits.introspection_limit,
            )?;
            for column in introspected {
                push_unique(&mut columns, column);
            }
        }

        columns.truncate(self.limits.max_columns);
        Ok(columns)
    }
}

fn push_unique(columns: &mut Vec<ColumnDescriptor>, column: ColumnDescriptor) {
    if !columns.iter().any(|c| c.column_name == column.column_name) {
        columns.push(column);
    }
}

#[derive(Default)]
struct TableGroup {
    schema: Option<String>,
    description: Option<String>,
    hits: BTreeSet<usize>,
}

/// Group comment rows by table, score by distinct keyword hits, and order
/// by score descending then name ascending.
fn rank_tables(rows: Vec<SchemaComment>, keywords: &Keywords, cap: usize) -> Vec<TableContext> {
    let mut groups: BTreeMap<String, TableGroup> = BTreeMap::new();

    for row in rows {
        let hits = keywords.hits(&row.table_name, row.comment.as_deref());
        let group = groups.entry(row.table_name).or_default();
        group.hits.extend(hits);
        if group.schema.is_none() {
            group.schema = row.schema_name;
        }
        if group.description.is_none() {
            group.description = row.comment.filter(|c| !c.trim().is_empty());
        }
    }

    let mut tables: Vec<TableContext> = groups
        .into_iter()
        .map(|(name, group)| TableContext {
            name,
            schema: group.schema,
            description: group.description,
            score: group.hits.len(),
            columns: Vec::new(),
        })
        .collect();

    // BTreeMap iteration already yields names ascending; the sort is stable.
    tables.sort_by_key(|t| Reverse(t.score));
    tables.truncate(cap);
    tables
}
