//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use strata_sources::{ConfigOptions, DEFAULT_CONFIG_DIR, DEFAULT_PREFIX, ScriptOptions};

/// Strata - inspect layered configuration
#[derive(Parser, Debug)]
#[command(name = "strata")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The base directory holding default/, <env>/ and local/
    #[arg(short, long, global = true, env = "STRATA_CONFIG_DIR", default_value = DEFAULT_CONFIG_DIR)]
    pub dir: PathBuf,

    /// Enable loading from script files (runs arbitrary code)
    #[arg(long, global = true)]
    pub enable_scripts: bool,

    /// Prefix for environment variables that override file values
    #[arg(short, long, global = true, env = "STRATA_ENV_PREFIX", default_value = DEFAULT_PREFIX)]
    pub prefix: String,

    /// Skip loading values from the local/ directory
    #[arg(long, global = true)]
    pub skip_local: bool,

    /// Environment to load (development, staging, production, ...)
    #[arg(short, long, global = true, env = "STRATA_ENV")]
    pub env: Option<String>,

    /// Output YAML
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub yaml: bool,

    /// Output JSON
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print the environment that will be used
    Env,

    /// Print the value at a dotted path, or the entire tree
    Get {
        /// Dotted path such as database.host
        path: Option<String>,
    },

    /// Print the keys of the mapping at a dotted path
    Keys {
        /// Dotted path such as database
        path: Option<String>,
    },
}

/// How values are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pretty,
    Json,
    Yaml,
}

impl Cli {
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else if self.yaml {
            OutputFormat::Yaml
        } else {
            OutputFormat::Pretty
        }
    }

    pub fn load_local(&self) -> bool {
        !self.skip_local
    }

    /// Options for resolving configuration from these arguments
    pub fn config_options(&self) -> ConfigOptions {
        ConfigOptions {
            env: self.env.clone(),
            dir: Some(self.dir.clone()),
            prefix: self.prefix.clone(),
            load_local_config: self.load_local(),
            scripts: self.enable_scripts.then(ScriptOptions::default),
            ..ConfigOptions::default()
        }
    }
}
