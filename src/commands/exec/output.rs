//! Output formatting for exec command results.

use super::execute::ExecResult;
use crate::output::{render_grid, Outputable};
use crate::types::ExecutionResult;

/// Grid plus row count, or the failure message.
pub(crate) fn execution_lines(result: &ExecutionResult) -> Vec<String> {
    let data = match (&result.data, result.success) {
        (Some(data), true) => data,
        _ => {
            let error = result.error.as_deref().unwrap_or("unknown error");
            return vec![format!("Execution failed: {}", error)];
        }
    };

    let mut lines = Vec::new();
    if !result.columns.is_empty() {
        lines.push(render_grid(&result.columns, data));
        lines.push(String::new());
    }
    let noun = if result.row_count == 1 { "row" } else { "rows" };
    lines.push(format!("({} {})", result.row_count, noun));
    lines
}

impl Outputable for ExecResult {
    fn to_table(&self) -> String {
        execution_lines(&self.result).join("\n")
    }
}
