//! Reducing completion text to a bare SQL string.

/// Strip markdown code fences and surrounding whitespace.
pub fn clean_sql(text: &str) -> String {
    text.replace("```sql", "").replace("```", "").trim().to_string()
}

/// Pull the SQL statement out of free-form role-play output.
///
/// Takes lines from the first one mentioning `SELECT` (any case) up to and
/// including the first one with a `;`, skipping blank and `#` lines. Falls
/// back to the whole text when no line mentions `SELECT`.
pub fn extract_sql(text: &str) -> String {
    let mut sql_lines: Vec<&str> = Vec::new();
    let mut in_sql = false;

    for line in text.lines() {
        if !in_sql && !line.to_uppercase().contains("SELECT") {
            continue;
        }
        in_sql = true;
        if !line.trim().is_empty() && !line.starts_with('#') {
            sql_lines.push(line);
        }
        if line.contains(';') {
            break;
        }
    }

    if sql_lines.is_empty() {
        text.trim().to_string()
    } else {
        sql_lines.join("\n")
    }
}
