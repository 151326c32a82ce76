//! The `env` command

use strata_core::validate_env_name;

use crate::cli::Cli;
use crate::error::Result;

/// Print the environment name that would be loaded
pub fn run_env(cli: &Cli) -> Result<()> {
    println!("{}", resolve_env(cli)?);
    Ok(())
}

fn resolve_env(cli: &Cli) -> Result<String> {
    let env = cli.config_options().resolve_env();
    validate_env_name(&env, cli.load_local())?;
    Ok(env)
}
