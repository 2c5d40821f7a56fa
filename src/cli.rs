//! CLI argument definitions.
//!
//! This module contains the top-level CLI structure and config file lookup.
//! Individual command definitions are in the `commands` module.

use clap::Parser;
use std::path::{Path, PathBuf};

use crate::commands::Command;
use crate::config::CONFIG_FILE_NAME;
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to a JSON config file (default: ./.query_agent.json, then ~/.query_agent.json)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Pick the config file to load.
///
/// An explicit path always wins, even if missing, so typos surface as
/// errors. Otherwise the working directory is checked before the home
/// directory; `None` means environment and defaults only.
pub fn resolve_config_path(explicit: Option<&Path>, home: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    home.map(|dir| dir.join(CONFIG_FILE_NAME))
        .filter(|path| path.is_file())
}

/// [`resolve_config_path`] against the user's real home directory.
pub fn default_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    resolve_config_path(explicit, home::home_dir().as_deref())
}
