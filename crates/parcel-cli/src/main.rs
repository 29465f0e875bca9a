//! Parcel CLI - Command-line interface
//!
//! Drives the geometry editor and the overlap detector from files.

mod cli;
mod commands;
mod config_loader;
mod errors;
mod output;
mod output_types;

use clap::Parser;
use cli::Cli;
use console::style;
use errors::CliError;

fn main() {
    // Logs go to stderr so --json output on stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = commands::execute(cli) {
        match e.downcast_ref::<CliError>() {
            Some(cli_error) => cli_error.display(),
            None => eprintln!("{} {:#}", style("✗").red().bold(), e),
        }
        std::process::exit(1);
    }
}
