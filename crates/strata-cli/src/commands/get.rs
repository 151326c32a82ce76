//! The `get` command

use strata_core::Settings;

use crate::cli::{Cli, OutputFormat};
use crate::error::{CliError, Result};
use crate::render::render;

/// Print the value at `path`, or the whole tree
pub fn run_get(cli: &Cli, path: Option<&str>) -> Result<()> {
    let config = cli.config_options().resolve()?;
    let format = cli.output_format();

    if format == OutputFormat::Pretty {
        for line in header(cli, config.env(), path) {
            println!("{line}");
        }
        println!("---");
    }

    let value = match path {
        Some(path) => config.get(path),
        None => Some(config.get_all()),
    };
    let value = value.ok_or_else(|| CliError::missing("value not found"))?;

    println!("{}", render(&value, format)?);
    Ok(())
}

/// Describes where the printed values came from
fn header(cli: &Cli, env: &str, path: Option<&str>) -> Vec<String> {
    let root = std::path::absolute(&cli.dir).unwrap_or_else(|_| cli.dir.clone());
    let marker = if cli.dir.is_dir() { "" } else { " <not found>" };
    vec![
        format!("config root: {}{marker}", root.display()),
        format!("environment: {env}"),
        format!("key path: {}", path.unwrap_or("(entire config tree)")),
        format!("environment variable prefix: {}", cli.prefix),
        format!(
            "load config from config/local: {}",
            if cli.load_local() { "yes" } else { "no" }
        ),
    ]
}
