//! Output formatting for ask command results.

use super::execute::AskResult;
use crate::commands::exec::execution_lines;
use crate::output::Outputable;

impl Outputable for AskResult {
    fn to_table(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Question: {}", self.question));
        lines.push(String::new());

        match &self.generated.query {
            Some(sql) => {
                lines.push("SQL:".to_string());
                for line in sql.lines() {
                    lines.push(format!("  {}", line));
                }
            }
            None => {
                let error = self.generated.error.as_deref().unwrap_or("unknown error");
                lines.push(format!("Failed to generate SQL: {}", error));
            }
        }

        if let Some(execution) = &self.execution {
            lines.push(String::new());
            lines.extend(execution_lines(execution));
        }

        lines.join("\n")
    }
}
