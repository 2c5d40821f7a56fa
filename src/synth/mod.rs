//! Turning a question plus schema context into SQL via a language model.

mod crew;
mod extract;
mod prompt;

pub use extract::{clean_sql, extract_sql};
pub use prompt::{direct_prompt, SYSTEM_MESSAGE};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::llm::{ChatMessage, CompletionClient, LlmError};

/// How SQL is requested from the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// One request with a fixed instruction template
    #[default]
    Direct,
    /// Analyst, expert and validator requests in sequence
    Crew,
}

#[derive(Debug, Clone, Default)]
pub struct Synthesizer {
    strategy: StrategyKind,
    hints: Vec<String>,
}

impl Synthesizer {
    pub fn new(strategy: StrategyKind, hints: Vec<String>) -> Self {
        Self { strategy, hints }
    }

    pub fn strategy(&self) -> StrategyKind {
        self.strategy
    }

    pub fn set_strategy(&mut self, strategy: StrategyKind) {
        self.strategy = strategy;
    }

    /// Produce a SQL string for the question.
    ///
    /// An answer that is empty once fences are stripped is an error.
    pub fn synthesize(
        &self,
        llm: &dyn CompletionClient,
        question: &str,
        context: &str,
    ) -> Result<String, LlmError> {
        info!(strategy = ?self.strategy, model = llm.model(), "synthesizing SQL");
        let sql = match self.strategy {
            StrategyKind::Direct => {
                let messages = [
                    ChatMessage::system(SYSTEM_MESSAGE),
                    ChatMessage::user(direct_prompt(question, context, &self.hints)),
                ];
                clean_sql(&llm.complete(&messages)?)
            }
            StrategyKind::Crew => crew::run(llm, question, context, &self.hints)?,
        };

        if sql.is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(sql)
    }
}
