use std::error::Error;

use serde::Serialize;

use super::ExecCmd;
use crate::agent::QueryAgent;
use crate::commands::Execute;
use crate::types::ExecutionResult;

/// Result of the exec command execution
#[derive(Debug, Serialize)]
pub struct ExecResult {
    pub sql: String,
    #[serde(flatten)]
    pub result: ExecutionResult,
}

impl Execute for ExecCmd {
    type Output = ExecResult;

    fn execute(self, agent: &mut QueryAgent) -> Result<Self::Output, Box<dyn Error>> {
        let result = agent.execute_query(&self.sql);
        Ok(ExecResult {
            sql: self.sql,
            result,
        })
    }
}
