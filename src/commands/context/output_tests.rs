//! Output formatting tests for context command.

#[cfg(test)]
mod tests {
    use super::super::execute::ContextResult;
    use crate::types::{ColumnDescriptor, Relationship, SchemaContext, TableContext};
    use rstest::{fixture, rstest};

    // =========================================================================
    // Expected outputs
    // =========================================================================

    const CATCHMENT_TABLE: &str = "\
Question: catchment area

Database Schema Context:

Table: catchment
  Description: catchment boundaries by country
  Columns:
    - area_km2: surface area in square kilometres
    - country_id

Relationships:
  - catchment.country_id -> country.id";

    const FALLBACK_TABLE: &str = "\
Question: xyzzy
(no keyword matched; showing the first commented tables)

Database Schema Context:

Table: country";

    const EMPTY_TABLE: &str = "\
Question: anything

No relevant tables found for the query.";

    // =========================================================================
    // Fixtures
    // =========================================================================

    fn table(name: &str, description: Option<&str>, columns: Vec<ColumnDescriptor>) -> TableContext {
        TableContext {
            name: name.to_string(),
            schema: Some("public".to_string()),
            description: description.map(str::to_string),
            score: 1,
            columns,
        }
    }

    fn column(name: &str, comment: Option<&str>) -> ColumnDescriptor {
        ColumnDescriptor {
            table_name: "catchment".to_string(),
            column_name: name.to_string(),
            data_type: None,
            comment: comment.map(str::to_string),
        }
    }

    #[fixture]
    fn catchment_result() -> ContextResult {
        ContextResult {
            question: "catchment area".to_string(),
            context: SchemaContext {
                tables: vec![table(
                    "catchment",
                    Some("catchment boundaries by country"),
                    vec![
                        column("area_km2", Some("surface area in square kilometres")),
                        column("country_id", None),
                    ],
                )],
                relationships: vec![Relationship::new("catchment", "country_id", "country", "id")],
                fallback: false,
            },
        }
    }

    #[fixture]
    fn fallback_result() -> ContextResult {
        ContextResult {
            question: "xyzzy".to_string(),
            context: SchemaContext {
                tables: vec![table("country", None, vec![])],
                relationships: vec![],
                fallback: true,
            },
        }
    }

    #[fixture]
    fn empty_result() -> ContextResult {
        ContextResult {
            question: "anything".to_string(),
            context: SchemaContext {
                fallback: true,
                ..SchemaContext::default()
            },
        }
    }

    // =========================================================================
    // Tests
    // =========================================================================

    crate::output_table_test! {
        test_name: test_to_table_catchment,
        fixture: catchment_result,
        fixture_type: ContextResult,
        expected: CATCHMENT_TABLE,
    }

    crate::output_table_test! {
        test_name: test_to_table_fallback,
        fixture: fallback_result,
        fixture_type: ContextResult,
        expected: FALLBACK_TABLE,
    }

    crate::output_table_test! {
        test_name: test_to_table_empty,
        fixture: empty_result,
        fixture_type: ContextResult,
        expected: EMPTY_TABLE,
    }

    crate::output_json_test! {
        test_name: test_format_json,
        fixture: catchment_result,
        fixture_type: ContextResult,
        assertions: {
            "question": "catchment area",
            "fallback": false,
        },
    }

    #[rstest]
    fn test_format_json_relationships(catchment_result: ContextResult) {
        use crate::output::{OutputFormat, Outputable};
        let parsed: serde_json::Value =
            serde_json::from_str(&catchment_result.format(OutputFormat::Json)).unwrap();
        assert_eq!(parsed["tables"][0]["columns"][0]["column_name"], "area_km2");
        assert_eq!(parsed["relationships"][0]["to_table"], "country");
    }

    crate::output_toon_test! {
        test_name: test_format_toon,
        fixture: catchment_result,
        fixture_type: ContextResult,
        contains: ["fallback: false", "relationships["],
    }
}
