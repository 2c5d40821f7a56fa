mod execute;
mod output;
mod output_tests;

pub use execute::ContextResult;

use clap::Args;

/// Show the schema context retrieved for a question, without calling the model
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  query_agent context How many catchments are in Uganda?
  query_agent context district population -o json")]
pub struct ContextCmd {
    /// The question, in plain words
    #[arg(required = true, num_args = 1..)]
    pub question: Vec<String>,
}
