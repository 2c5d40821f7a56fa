mod execute;
mod output;

pub use execute::ValidateResult;

use clap::Args;

/// Check a SQL statement with the database planner
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  query_agent validate --sql 'SELECT count(*) FROM catchment'")]
pub struct ValidateCmd {
    /// SQL statement to check; it is planned with EXPLAIN, never run
    #[arg(short, long)]
    pub sql: String,
}
