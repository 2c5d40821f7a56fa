use std::error::Error;

use serde::Serialize;

use super::ContextCmd;
use crate::agent::QueryAgent;
use crate::commands::Execute;
use crate::types::SchemaContext;

/// Result of the context command execution
#[derive(Debug, Serialize)]
pub struct ContextResult {
    pub question: String,
    #[serde(flatten)]
    pub context: SchemaContext,
}

impl Execute for ContextCmd {
    type Output = ContextResult;

    fn execute(self, agent: &mut QueryAgent) -> Result<Self::Output, Box<dyn Error>> {
        let question = self.question.join(" ");
        let context = agent.schema_context(&question)?;
        Ok(ContextResult { question, context })
    }
}
