use std::error::Error;

use serde::Serialize;

use super::ValidateCmd;
use crate::agent::QueryAgent;
use crate::commands::Execute;
use crate::types::ValidationResult;

/// Result of the validate command execution
#[derive(Debug, Serialize)]
pub struct ValidateResult {
    pub sql: String,
    #[serde(flatten)]
    pub result: ValidationResult,
}

impl Execute for ValidateCmd {
    type Output = ValidateResult;

    fn execute(self, agent: &mut QueryAgent) -> Result<Self::Output, Box<dyn Error>> {
        let result = agent.validate_query(&self.sql);
        Ok(ValidateResult {
            sql: self.sql,
            result,
        })
    }
}
