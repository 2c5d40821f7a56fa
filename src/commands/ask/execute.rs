use std::error::Error;

use serde::Serialize;

use super::AskCmd;
use crate::agent::QueryAgent;
use crate::commands::Execute;
use crate::types::{ExecutionResult, GeneratedQuery};

/// Result of the ask command execution
#[derive(Debug, Serialize)]
pub struct AskResult {
    pub question: String,
    #[serde(flatten)]
    pub generated: GeneratedQuery,
    /// Present only when execution was requested and SQL was generated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution: Option<ExecutionResult>,
}

impl Execute for AskCmd {
    type Output = AskResult;

    fn execute(self, agent: &mut QueryAgent) -> Result<Self::Output, Box<dyn Error>> {
        let question = self.question.join(" ");
        if let Some(strategy) = self.strategy {
            agent.set_strategy(strategy);
        }

        let generated = agent.generate_sql(&question);
        let execution = match (&generated.query, self.execute) {
            (Some(sql), true) => Some(agent.execute_query(sql)),
            _ => None,
        };

        Ok(AskResult {
            question,
            generated,
            execution,
        })
    }
}
