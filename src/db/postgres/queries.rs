//! SQL text for comment-table and introspection lookups.
//!
//! The comment-table schema is configurable and spliced in as a quoted
//! identifier; everything else is a bind parameter. Every selected column is
//! cast to `text` because `information_schema` exposes domain types
//! (`sql_identifier`, `character_data`) the client cannot decode directly.

use crate::db::escape::quote_identifier;

/// Table comments hit by any keyword.
///
/// `$1` is the `%token%` pattern array, `$2` the raw token array (for the
/// identifier-in-token test).
pub fn table_comments_matching(schema: &str) -> String {
    format!(
        r#"SELECT t.table_name::text, t.schema_name::text, t.comment::text
FROM {}.comment_on_table t
WHERE lower(t.comment) LIKE ANY($1::text[])
   OR lower(t.table_name) LIKE ANY($1::text[])
   OR EXISTS (
        SELECT 1 FROM unnest($2::text[]) AS k(word)
        WHERE t.table_name <> '' AND strpos(k.word, lower(t.table_name)) > 0
   )
ORDER BY t.table_name"#,
        quote_identifier(schema)
    )
}

/// First row per commented table, in name order. `$1` is the limit.
pub fn commented_tables(schema: &str) -> String {
    format!(
        r#"SELECT DISTINCT ON (t.table_name) t.table_name::text, t.schema_name::text, t.comment::text
FROM {}.comment_on_table t
ORDER BY t.table_name
LIMIT $1"#,
        quote_identifier(schema)
    )
}

/// Column comments of one table hit by any keyword, with the data type
/// joined from introspection.
///
/// `$1` table, `$2` patterns, `$3` tokens, `$4` limit.
pub fn column_comments_matching(schema: &str) -> String {
    format!(
        r#"SELECT c.column_name::text, c.comment::text, ic.data_type::text
FROM {}.comment_on_column c
LEFT JOIN information_schema.columns ic
       ON ic.table_name::text = c.table_name::text
      AND ic.column_name::text = c.column_name::text
      AND ic.table_schema::text = c.schema_name::text
WHERE c.table_name::text = $1
  AND (lower(c.comment) LIKE ANY($2::text[])
       OR lower(c.column_name) LIKE ANY($2::text[])
       OR EXISTS (
            SELECT 1 FROM unnest($3::text[]) AS k(word)
            WHERE c.column_name <> '' AND strpos(k.word, lower(c.column_name)) > 0
       ))
ORDER BY c.column_name
LIMIT $4"#,
        quote_identifier(schema)
    )
}

/// `$1` table, `$2` optional schema filter, `$3` limit.
pub const INTROSPECT_COLUMNS: &str = r#"SELECT column_name::text, data_type::text
FROM information_schema.columns
WHERE table_name::text = $1
  AND ($2::text IS NULL OR table_schema::text = $2::text)
ORDER BY ordinal_position
LIMIT $3"#;

/// `$1` candidate table names, `$2` limit.
pub const FOREIGN_KEYS: &str = r#"SELECT
    tc.table_name::text AS from_table,
    kcu.column_name::text AS from_column,
    ccu.table_name::text AS to_table,
    ccu.column_name::text AS to_column
FROM information_schema.table_constraints AS tc
JOIN information_schema.key_column_usage AS kcu
    ON tc.constraint_name = kcu.constraint_name
   AND tc.constraint_schema = kcu.constraint_schema
JOIN information_schema.constraint_column_usage AS ccu
    ON ccu.constraint_name = tc.constraint_name
   AND ccu.constraint_schema = tc.constraint_schema
WHERE tc.constraint_type = 'FOREIGN KEY'
  AND (tc.table_name::text = ANY($1::text[]) OR ccu.table_name::text = ANY($1::text[]))
ORDER BY 1, 2
LIMIT $2"#;
