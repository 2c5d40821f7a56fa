//! The agent facade: one database connection, one completion client.

use std::path::Path;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{AppConfig, ConfigError, RetrievalSettings};
use crate::db::{DatabaseBackend, DbError, PostgresBackend};
use crate::llm::{CompletionClient, OpenAiClient};
use crate::retrieval::{render, RelevanceSelector};
use crate::synth::{StrategyKind, Synthesizer};
use crate::types::{ExecutionResult, GeneratedQuery, SchemaContext, ValidationResult};

pub const VALID_QUERY_MESSAGE: &str = "Query is valid";

/// Errors that prevent an agent from being built.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Db(#[from] DbError),
}

/// Answers natural-language questions with SQL against one database.
///
/// Runtime failures (retrieval, model, execution) come back as data in the
/// result envelopes; only construction returns `Err`.
pub struct QueryAgent {
    db: Box<dyn DatabaseBackend>,
    llm: Box<dyn CompletionClient>,
    selector: RelevanceSelector,
    synthesizer: Synthesizer,
    preview_chars: usize,
}

impl QueryAgent {
    /// Resolve configuration and connect.
    pub fn load(config_path: Option<&Path>) -> Result<Self, AgentError> {
        let config = AppConfig::load(config_path)?;
        Self::connect(&config)
    }

    /// Open the database connection and build the HTTP client.
    pub fn connect(config: &AppConfig) -> Result<Self, AgentError> {
        let db = PostgresBackend::connect(&config.database)?;
        let llm = OpenAiClient::new(config.llm.clone());
        info!(database = %config.database.describe(), model = %config.llm.model, "agent ready");
        Ok(Self::new(Box::new(db), Box::new(llm), &config.retrieval))
    }

    pub fn new(
        db: Box<dyn DatabaseBackend>,
        llm: Box<dyn CompletionClient>,
        retrieval: &RetrievalSettings,
    ) -> Self {
        Self {
            db,
            llm,
            selector: RelevanceSelector::new(retrieval.limits),
            synthesizer: Synthesizer::new(retrieval.strategy, retrieval.prompt_hints.clone()),
            preview_chars: retrieval.preview_chars,
        }
    }

    pub fn strategy(&self) -> StrategyKind {
        self.synthesizer.strategy()
    }

    pub fn set_strategy(&mut self, strategy: StrategyKind) {
        self.synthesizer.set_strategy(strategy);
    }

    /// Retrieve the schema context for a question without calling the model.
    pub fn schema_context(&mut self, question: &str) -> Result<SchemaContext, DbError> {
        self.selector.select(self.db.as_mut(), question)
    }

    /// Generate SQL for a question.
    pub fn generate_sql(&mut self, question: &str) -> GeneratedQuery {
        let context = match self.schema_context(question) {
            Ok(context) => render(&context),
            Err(e) => {
                warn!(error = %e, "schema retrieval failed");
                return GeneratedQuery::failed(e.to_string());
            }
        };

        match self
            .synthesizer
            .synthesize(self.llm.as_ref(), question, &context)
        {
            Ok(sql) => {
                debug!(sql = %sql, "generated query");
                let preview: String = context.chars().take(self.preview_chars).collect();
                GeneratedQuery::ok(sql, preview)
            }
            Err(e) => {
                warn!(error = %e, "query synthesis failed");
                GeneratedQuery::failed(e.to_string())
            }
        }
    }

    /// Run a statement and materialize every row.
    pub fn execute_query(&mut self, sql: &str) -> ExecutionResult {
        if sql.trim().is_empty() {
            return ExecutionResult::failed("No SQL query provided".to_string());
        }

        debug!(sql, "executing query");
        match self.db.run_query(sql) {
            Ok(result) => {
                info!(rows = result.rows.len(), "query executed");
                ExecutionResult::from_rows(result.headers, result.rows)
            }
            Err(e) => {
                warn!(error = %e, "query execution failed");
                ExecutionResult::failed(e.to_string())
            }
        }
    }

    /// Check a statement with the database planner.
    pub fn validate_query(&mut self, sql: &str) -> ValidationResult {
        match self.db.explain(sql) {
            Ok(plan) => {
                debug!(plan_lines = plan.len(), "query planned");
                ValidationResult {
                    valid: true,
                    message: VALID_QUERY_MESSAGE.to_string(),
                }
            }
            Err(e) => ValidationResult {
                valid: false,
                message: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryBackend, QueryResult};
    use crate::llm::LlmError;
    use crate::test_utils::{catchment_db, test_agent, ScriptedCompletion};
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn test_generate_sql_success() {
        let llm = ScriptedCompletion::replying(&["```sql\nSELECT count(*) FROM catchment;\n```"]);
        let log = llm.request_log();
        let mut agent = test_agent(catchment_db(), llm);

        let result = agent.generate_sql("How many catchments are in Uganda?");
        assert!(result.success);
        assert_eq!(result.query.as_deref(), Some("SELECT count(*) FROM catchment;"));
        assert!(result.schema_context.starts_with("Database Schema Context:"));
        assert!(log.borrow()[0][1].content.contains("Table: catchment"));
    }

    #[rstest]
    fn test_schema_preview_is_truncated() {
        let llm = ScriptedCompletion::replying(&["SELECT 1;"]);
        let settings = RetrievalSettings {
            preview_chars: 24,
            ..RetrievalSettings::default()
        };
        let mut agent = QueryAgent::new(Box::new(catchment_db()), Box::new(llm), &settings);
        let result = agent.generate_sql("catchment");
        assert_eq!(result.schema_context, "Database Schema Context:");
    }

    #[rstest]
    fn test_generate_sql_api_failure() {
        let llm = ScriptedCompletion::new(vec![Err(LlmError::Api {
            status: 429,
            body: "rate limited".to_string(),
        })]);
        let mut agent = test_agent(catchment_db(), llm);

        let result = agent.generate_sql("catchment");
        assert!(!result.success);
        assert!(result.query.is_none());
        assert_eq!(result.error.as_deref(), Some("OpenAI API error: 429 - rate limited"));
    }

    #[rstest]
    fn test_generate_sql_retrieval_failure() {
        let db = catchment_db().failing_metadata("ERROR: permission denied for table comment_on_table");
        let llm = ScriptedCompletion::replying(&["SELECT 1;"]);
        let log = llm.request_log();
        let mut agent = test_agent(db, llm);

        let result = agent.generate_sql("catchment");
        assert!(!result.success);
        assert_eq!(
            result.error.as_deref(),
            Some("ERROR: permission denied for table comment_on_table")
        );
        assert!(log.borrow().is_empty());
    }

    #[rstest]
    fn test_generate_sql_empty_answer_fails() {
        let llm = ScriptedCompletion::replying(&["   "]);
        let mut agent = test_agent(catchment_db(), llm);
        assert!(!agent.generate_sql("catchment").success);
    }

    #[rstest]
    fn test_set_strategy_switches_to_crew() {
        let llm = ScriptedCompletion::replying(&["a", "SELECT 1;", "SELECT 1;"]);
        let log = llm.request_log();
        let mut agent = test_agent(catchment_db(), llm);
        agent.set_strategy(StrategyKind::Crew);
        assert_eq!(agent.strategy(), StrategyKind::Crew);
        assert!(agent.generate_sql("catchment").success);
        assert_eq!(log.borrow().len(), 3);
    }

    #[rstest]
    fn test_execute_query_rows() {
        let db = MemoryBackend::new().statement(
            "SELECT name, area FROM catchment",
            QueryResult {
                headers: vec!["name".to_string(), "area".to_string()],
                rows: vec![
                    vec![json!("Nile"), json!(12.5)],
                    vec![json!("Kafu"), json!(3)],
                ],
            },
        );
        let mut agent = test_agent(db, ScriptedCompletion::replying(&[]));

        let result = agent.execute_query("SELECT name, area FROM catchment");
        assert!(result.success);
        assert_eq!(result.row_count, 2);
        assert_eq!(result.columns, vec!["name", "area"]);
        let data = result.data.unwrap();
        assert_eq!(data[1]["name"], json!("Kafu"));
    }

    #[rstest]
    fn test_execute_query_zero_rows() {
        let db = MemoryBackend::new().statement(
            "SELECT id FROM country WHERE false",
            QueryResult {
                headers: vec!["id".to_string()],
                rows: vec![],
            },
        );
        let mut agent = test_agent(db, ScriptedCompletion::replying(&[]));

        let result = agent.execute_query("SELECT id FROM country WHERE false");
        assert!(result.success);
        assert_eq!(result.row_count, 0);
        assert_eq!(result.data, Some(vec![]));
    }

    #[rstest]
    fn test_execute_query_error() {
        let db = MemoryBackend::new()
            .failing_statement("SELECT 1/0", "ERROR: division by zero");
        let mut agent = test_agent(db, ScriptedCompletion::replying(&[]));

        let result = agent.execute_query("SELECT 1/0");
        assert!(!result.success);
        assert!(result.data.is_none());
        assert_eq!(result.error.as_deref(), Some("ERROR: division by zero"));
    }

    #[rstest]
    fn test_execute_blank_sql() {
        let mut agent = test_agent(MemoryBackend::new(), ScriptedCompletion::replying(&[]));
        assert!(!agent.execute_query("  ").success);
    }

    #[rstest]
    fn test_validate_query() {
        let db = MemoryBackend::new()
            .statement("SELECT 1", QueryResult::default())
            .failing_statement("SELEC 1", "ERROR: syntax error at or near \"SELEC\"");
        let mut agent = test_agent(db, ScriptedCompletion::replying(&[]));

        let ok = agent.validate_query("SELECT 1");
        assert!(ok.valid);
        assert_eq!(ok.message, VALID_QUERY_MESSAGE);

        let bad = agent.validate_query("SELEC 1");
        assert!(!bad.valid);
        assert!(bad.message.contains("syntax error"));
    }

    #[rstest]
    fn test_schema_context_without_comments_is_empty() {
        let mut agent = test_agent(MemoryBackend::new(), ScriptedCompletion::replying(&[]));
        let context = agent.schema_context("anything").unwrap();
        assert!(context.is_empty());
        assert_eq!(render(&context), "No relevant tables found for the query.");
    }
}
