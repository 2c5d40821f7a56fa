use clap::Parser;
use tracing_subscriber::EnvFilter;

use query_agent::agent::QueryAgent;
use query_agent::cli::{default_config_path, Args};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries command output only
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    args.command.check()?;

    let config_path = default_config_path(args.config.as_deref());
    let mut agent = QueryAgent::load(config_path.as_deref())?;
    let output = args.command.run(&mut agent, args.format)?;
    println!("{}", output);
    Ok(())
}
