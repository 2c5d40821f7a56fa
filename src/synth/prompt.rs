//! Prompt text for the direct strategy.

pub const SYSTEM_MESSAGE: &str = "You are a PostgreSQL database expert. Generate only SQL queries.";

const INSTRUCTIONS: [&str; 5] = [
    "Generate ONLY the SQL query, no explanations",
    "Use proper PostgreSQL syntax",
    "Include necessary JOINs if multiple tables are involved",
    "Use appropriate WHERE clauses and aggregations",
    "Consider query performance",
];

/// Build the user message: question, rendered context, numbered
/// instructions with any configured hints appended to the list.
pub fn direct_prompt(question: &str, context: &str, hints: &[String]) -> String {
    let mut prompt = String::from(
        "You are a PostgreSQL expert. Generate a SQL query based on the user's question and the provided database schema.\n\n",
    );
    prompt.push_str(&format!("User Question: {}\n\n", question));
    prompt.push_str(context);
    prompt.push_str("\n\nInstructions:\n");

    let hints = hints.iter().map(String::as_str).filter(|h| !h.trim().is_empty());
    for (idx, line) in INSTRUCTIONS.iter().copied().chain(hints).enumerate() {
        prompt.push_str(&format!("{}. {}\n", idx + 1, line.trim()));
    }

    prompt.push_str("\nReturn ONLY the SQL query without any markdown formatting or explanations.");
    prompt
}
