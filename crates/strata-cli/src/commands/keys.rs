//! The `keys` command

use strata_core::{Settings, Value};

use crate::cli::Cli;
use crate::error::{CliError, Result};
use crate::render::render;

/// Print the keys of the mapping at `path`, or of the root
pub fn run_keys(cli: &Cli, path: Option<&str>) -> Result<()> {
    let config = cli.config_options().resolve()?;

    let keys = match path {
        Some(path) => config.keys_at(path),
        None => config.keys(),
    }
    .ok_or_else(|| CliError::missing("config item not found or is not an object with keys"))?;

    let listing = Value::Sequence(keys.into_iter().map(Value::String).collect());
    println!("{}", render(&listing, cli.output_format())?);
    Ok(())
}
