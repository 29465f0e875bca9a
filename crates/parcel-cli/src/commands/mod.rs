//! Command implementations

mod config;
pub mod edit;
mod inspect;
mod overlaps;

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;
use anyhow::Result;

/// Execute a CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config_file = cli.config.as_deref();

    match cli.command {
        Commands::Inspect(args) => inspect::execute(args, config_file, &output),
        Commands::Edit(args) => edit::execute(args, config_file, &output),
        Commands::Overlaps(args) => overlaps::execute(args, config_file, &output),
        Commands::Config => config::execute(config_file, &output),
    }
}
