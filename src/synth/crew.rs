//! Three-step role-played synthesis: analyse the schema, write the query,
//! then review it. Each step is a single-turn request whose output is
//! handed to the next step.

use tracing::info;

use super::extract::{clean_sql, extract_sql};
use crate::llm::{ChatMessage, CompletionClient, LlmError};

struct Role {
    title: &'static str,
    goal: &'static str,
    backstory: &'static str,
}

impl Role {
    fn system_message(&self) -> String {
        format!(
            "You are the {}. Your goal: {}. {}",
            self.title, self.goal, self.backstory
        )
    }
}

const SCHEMA_ANALYST: Role = Role {
    title: "Database Schema Analyst",
    goal: "analyze the database schema and identify the tables and columns relevant to the query",
    backstory: "You are an expert database analyst with deep knowledge of PostgreSQL. \
                You work out which tables and columns answer a natural language question.",
};

const SQL_EXPERT: Role = Role {
    title: "SQL Query Expert",
    goal: "generate optimized PostgreSQL queries based on a schema analysis",
    backstory: "You write efficient, accurate SQL, including JOINs, aggregations and \
                window functions when needed.",
};

const QUERY_VALIDATOR: Role = Role {
    title: "Query Validator",
    goal: "validate and optimize SQL queries for correctness and performance",
    backstory: "You check queries for syntax errors, wrong table or column names and \
                unsafe operations.",
};

fn analysis_task(question: &str, context: &str) -> String {
    format!(
        "Analyze the following user query and database schema to identify relevant tables and columns:\n\n\
         User Query: {question}\n\n\
         Schema Context:\n{context}\n\n\
         Provide a clear analysis of:\n\
         1. Which tables are needed\n\
         2. Which columns should be selected\n\
         3. What joins might be required\n\
         4. Any aggregations or filters needed"
    )
}

fn sql_task(question: &str, analysis: &str, hints: &[String]) -> String {
    let mut task = format!(
        "Based on the schema analysis, generate a PostgreSQL query for:\n\n\
         User Query: {question}\n\n\
         Schema analysis:\n{analysis}\n\n\
         Requirements:\n\
         - Use proper PostgreSQL syntax\n\
         - Include necessary JOINs\n\
         - Add appropriate WHERE clauses\n\
         - Use aggregations if needed\n\
         - Consider query performance\n"
    );
    for hint in hints.iter().filter(|h| !h.trim().is_empty()) {
        task.push_str(&format!("- {}\n", hint.trim()));
    }
    task.push_str("- Return only the SQL query without explanations");
    task
}

fn validation_task(draft: &str) -> String {
    format!(
        "Validate the generated SQL query:\n\n{draft}\n\n\
         1. Check for syntax errors\n\
         2. Verify table and column names\n\
         3. Suggest performance optimizations\n\
         4. Ensure query safety\n\n\
         Return the final optimized query."
    )
}

fn run_step(llm: &dyn CompletionClient, role: &Role, task: String) -> Result<String, LlmError> {
    info!(role = role.title, model = llm.model(), "running crew step");
    llm.complete(&[ChatMessage::system(role.system_message()), ChatMessage::user(task)])
}

/// Run the three steps and reduce the reviewer's answer to SQL.
pub fn run(
    llm: &dyn CompletionClient,
    question: &str,
    context: &str,
    hints: &[String],
) -> Result<String, LlmError> {
    let analysis = run_step(llm, &SCHEMA_ANALYST, analysis_task(question, context))?;
    let draft = run_step(llm, &SQL_EXPERT, sql_task(question, &analysis, hints))?;
    let reviewed = run_step(llm, &QUERY_VALIDATOR, validation_task(&draft))?;
    Ok(clean_sql(&extract_sql(&reviewed)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ScriptedCompletion;
    use rstest::rstest;

    #[rstest]
    fn test_steps_hand_off_output() {
        let llm = ScriptedCompletion::replying(&[
            "Use table catchment joined to country.",
            "SELECT count(*) FROM catchment;",
            "Looks right.\n```sql\nSELECT count(*) FROM catchment c JOIN country k ON k.id = c.country_id;\n```",
        ]);
        let sql = run(&llm, "How many catchments?", "Database Schema Context:", &[]).unwrap();
        assert_eq!(
            sql,
            "SELECT count(*) FROM catchment c JOIN country k ON k.id = c.country_id;"
        );

        let requests = llm.requests();
        assert_eq!(requests.len(), 3);
        assert!(requests[0][0].content.contains("Database Schema Analyst"));
        assert!(requests[0][1].content.contains("Schema Context:\nDatabase Schema Context:"));
        assert!(requests[1][1].content.contains("Use table catchment joined to country."));
        assert!(requests[2][1].content.contains("SELECT count(*) FROM catchment;"));
    }

    #[rstest]
    fn test_hints_reach_sql_step() {
        let llm = ScriptedCompletion::replying(&["analysis", "SELECT 1;", "SELECT 1;"]);
        let hints = vec!["Tables are denormalized".to_string()];
        run(&llm, "q", "ctx", &hints).unwrap();
        assert!(llm.requests()[1][1].content.contains("- Tables are denormalized\n"));
    }

    #[rstest]
    fn test_failure_stops_the_crew() {
        let llm = ScriptedCompletion::new(vec![
            Ok("analysis".to_string()),
            Err(LlmError::Api {
                status: 500,
                body: "boom".to_string(),
            }),
        ]);
        let err = run(&llm, "q", "ctx", &[]).unwrap_err();
        assert_eq!(err.to_string(), "OpenAI API error: 500 - boom");
        assert_eq!(llm.requests().len(), 2);
    }
}
