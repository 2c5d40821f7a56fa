mod execute;
mod output;

pub use execute::ExecResult;
pub(crate) use output::execution_lines;

use clap::Args;

/// Execute a SQL statement against the configured database
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  query_agent exec --sql 'SELECT count(*) FROM catchment'
  query_agent exec -s 'SELECT * FROM country LIMIT 5' -o json")]
pub struct ExecCmd {
    /// SQL statement to run (a single statement)
    #[arg(short, long)]
    pub sql: String,
}
