//! Rendering of a `SchemaContext` into the prompt text block.

use std::fmt;

use crate::types::{ColumnDescriptor, SchemaContext};

pub const CONTEXT_HEADER: &str = "Database Schema Context:";
pub const NO_TABLES_MESSAGE: &str = "No relevant tables found for the query.";

/// Render the fixed-format context block.
pub fn render(context: &SchemaContext) -> String {
    if context.tables.is_empty() {
        return NO_TABLES_MESSAGE.to_string();
    }

    let mut out = String::new();
    out.push_str(CONTEXT_HEADER);
    out.push_str("\n\n");

    for table in &context.tables {
        out.push_str(&format!("Table: {}\n", table.name));
        if let Some(description) = non_blank(table.description.as_deref()) {
            out.push_str(&format!("  Description: {}\n", description));
        }
        if !table.columns.is_empty() {
            out.push_str("  Columns:\n");
            for column in &table.columns {
                out.push_str(&format!("    - {}\n", column_line(column)));
            }
        }
        out.push('\n');
    }

    if !context.relationships.is_empty() {
        out.push_str("Relationships:\n");
        for rel in &context.relationships {
            out.push_str(&format!(
                "  - {}.{} -> {}.{}\n",
                rel.from_table, rel.from_column, rel.to_table, rel.to_column
            ));
        }
    }

    out
}

fn column_line(column: &ColumnDescriptor) -> String {
    match non_blank(column.comment.as_deref()) {
        Some(comment) => format!("{}: {}", column.column_name, comment),
        None => column.column_name.clone(),
    }
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}

impl fmt::Display for SchemaContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Relationship, TableContext};
    use rstest::{fixture, rstest};

    fn column(table: &str, name: &str, comment: Option<&str>) -> ColumnDescriptor {
        ColumnDescriptor {
            table_name: table.to_string(),
            column_name: name.to_string(),
            data_type: None,
            comment: comment.map(str::to_string),
        }
    }

    const CATCHMENT_CONTEXT: &str = "\
Database Schema Context:

Table: catchment
  Description: catchment boundaries by country
  Columns:
    - area_km2: surface area in square kilometres
    - country_id

Table: country
  Columns:
    - id

Relationships:
  - catchment.country_id -> country.id
";

    #[fixture]
    fn catchment_context() -> SchemaContext {
        SchemaContext {
            tables: vec![
                TableContext {
                    name: "catchment".to_string(),
                    schema: Some("public".to_string()),
                    description: Some("catchment boundaries by country".to_string()),
                    score: 1,
                    columns: vec![
                        column("catchment", "area_km2", Some("surface area in square kilometres")),
                        column("catchment", "country_id", None),
                    ],
                },
                TableContext {
                    name: "country".to_string(),
                    schema: None,
                    description: None,
                    score: 0,
                    columns: vec![column("country", "id", Some("  "))],
                },
            ],
            relationships: vec![Relationship::new("catchment", "country_id", "country", "id")],
            fallback: false,
        }
    }

    #[rstest]
    fn test_render_full_context(catchment_context: SchemaContext) {
        assert_eq!(render(&catchment_context), CATCHMENT_CONTEXT);
    }

    #[rstest]
    fn test_relationship_renders_directionally(catchment_context: SchemaContext) {
        assert!(render(&catchment_context).contains("catchment.country_id -> country.id"));
    }

    #[rstest]
    fn test_bare_table_renders_header_only() {
        let context = SchemaContext {
            tables: vec![TableContext {
                name: "lonely".to_string(),
                schema: None,
                description: None,
                score: 0,
                columns: vec![],
            }],
            relationships: vec![],
            fallback: true,
        };
        assert_eq!(render(&context), "Database Schema Context:\n\nTable: lonely\n\n");
    }

    #[rstest]
    fn test_empty_context_message() {
        assert_eq!(render(&SchemaContext::default()), NO_TABLES_MESSAGE);
    }

    #[rstest]
    fn test_display_matches_render(catchment_context: SchemaContext) {
        assert_eq!(catchment_context.to_string(), render(&catchment_context));
    }
}
