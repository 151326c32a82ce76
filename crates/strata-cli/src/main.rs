//! Strata CLI
//!
//! Inspect the configuration an application would resolve.

mod cli;
mod commands;
mod error;
mod render;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        match e {
            CliError::Missing { .. } => println!("err: {e}"),
            _ => eprintln!("{}: {}", "error".red().bold(), e),
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| CliError::user(format!("Failed to set tracing subscriber: {e}")))?;
        tracing::debug!("Verbose mode enabled");
    }

    match &cli.command {
        Some(command) => execute_command(&cli, command),
        None => {
            println!("{} layered configuration", "strata".green().bold());
            println!();
            println!("Run {} for available commands.", "strata --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(cli: &Cli, command: &Commands) -> Result<()> {
    match command {
        Commands::Env => commands::run_env(cli),
        Commands::Get { path } => commands::run_get(cli, path.as_deref()),
        Commands::Keys { path } => commands::run_keys(cli, path.as_deref()),
    }
}
