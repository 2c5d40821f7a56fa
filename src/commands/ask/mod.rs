mod cli_tests;
mod execute;
mod output;

pub use execute::AskResult;

use clap::Args;

use crate::synth::StrategyKind;

/// Generate SQL for a natural-language question
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  query_agent ask How many catchments are in Uganda?
  query_agent ask --execute list districts by population
  query_agent ask --strategy crew -o json total area of catchments per country")]
pub struct AskCmd {
    /// The question, in plain words
    #[arg(required = true, num_args = 1..)]
    pub question: Vec<String>,

    /// Run the generated query and show its rows
    #[arg(short = 'x', long, default_value_t = false)]
    pub execute: bool,

    /// Synthesis strategy (defaults to the configured one)
    #[arg(short, long, value_enum)]
    pub strategy: Option<StrategyKind>,
}
