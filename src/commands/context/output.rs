//! Output formatting for context command results.

use super::execute::ContextResult;
use crate::output::Outputable;
use crate::retrieval::render;

impl Outputable for ContextResult {
    fn to_table(&self) -> String {
        let mut lines = vec![format!("Question: {}", self.question)];
        if self.context.fallback && !self.context.is_empty() {
            lines.push("(no keyword matched; showing the first commented tables)".to_string());
        }
        lines.push(String::new());
        lines.push(render(&self.context).trim_end().to_string());
        lines.join("\n")
    }
}
