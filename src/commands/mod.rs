//! Command definitions and implementations.
//!
//! Each command is defined in its own module with:
//! - The command struct with clap attributes for CLI parsing
//! - `execute.rs` producing a serializable result from the agent
//! - `output.rs` rendering that result as a table

mod ask;
mod context;
mod exec;
mod validate;

pub use ask::AskCmd;
pub use context::ContextCmd;
pub use exec::ExecCmd;
pub use validate::ValidateCmd;

use clap::Subcommand;
use std::error::Error;

use crate::agent::QueryAgent;
use crate::output::{OutputFormat, Outputable};

/// Trait for executing commands with command-specific result types.
pub trait Execute {
    type Output: Outputable;

    fn execute(self, agent: &mut QueryAgent) -> Result<Self::Output, Box<dyn Error>>;
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate SQL for a natural-language question, optionally running it
    Ask(AskCmd),

    /// Show the schema context retrieved for a question
    Context(ContextCmd),

    /// Execute a SQL statement and show the rows
    Exec(ExecCmd),

    /// Check a SQL statement with EXPLAIN without running it
    Validate(ValidateCmd),

    /// Catch-all for unknown commands
    #[command(external_subcommand)]
    Unknown(Vec<String>),
}

impl Command {
    /// Execute the command and return formatted output
    pub fn run(self, agent: &mut QueryAgent, format: OutputFormat) -> Result<String, Box<dyn Error>> {
        match self {
            Command::Ask(cmd) => {
                let result = cmd.execute(agent)?;
                Ok(result.format(format))
            }
            Command::Context(cmd) => {
                let result = cmd.execute(agent)?;
                Ok(result.format(format))
            }
            Command::Exec(cmd) => {
                let result = cmd.execute(agent)?;
                Ok(result.format(format))
            }
            Command::Validate(cmd) => {
                let result = cmd.execute(agent)?;
                Ok(result.format(format))
            }
            Command::Unknown(args) => Err(unknown_command(&args)),
        }
    }

    /// Reject unknown commands before any connection is attempted.
    pub fn check(&self) -> Result<(), Box<dyn Error>> {
        match self {
            Command::Unknown(args) => Err(unknown_command(args)),
            _ => Ok(()),
        }
    }
}

fn unknown_command(args: &[String]) -> Box<dyn Error> {
    format!("Unknown command: {}", args.first().map(String::as_str).unwrap_or_default()).into()
}
