//! Identifier quoting for SQL text that cannot be parameterized.

/// Quote an identifier for PostgreSQL, doubling embedded double quotes.
///
/// Used for the configured comment-table schema, which is spliced into the
/// query text because identifiers cannot be bind parameters.
pub fn quote_identifier(name: &str) -> String {
    let mut result = String::with_capacity(name.len() + 2);
    result.push('"');
    for c in name.chars() {
        if c == '"' {
            result.push('"');
        }
        result.push(c);
    }
    result.push('"');
    result
}
