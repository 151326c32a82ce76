//! The standard five-layer setup
//!
//! [`ConfigOptions::resolve`] loads, in precedence order:
//!
//! 1. `<dir>/default`
//! 2. `<dir>/<env>`
//! 3. `<dir>/local` (unless disabled)
//! 4. the explicit `json` tree
//! 5. prefixed environment variables

use std::path::PathBuf;

use strata_core::{Config, ConfigBuilder, Layer, Value};

use crate::directory::FilesSource;
use crate::env::{DEFAULT_PREFIX, EnvSource};
use crate::script::ScriptOptions;

/// Variable naming the environment when none is given
pub const ENV_VAR: &str = "STRATA_ENV";

/// Variable naming the configuration root when none is given
pub const CONFIG_DIR_VAR: &str = "STRATA_CONFIG_DIR";

pub const DEFAULT_ENV: &str = "development";

pub const DEFAULT_CONFIG_DIR: &str = "config";

/// Options for building a [`Config`] from the standard sources
///
/// # Example
///
/// ```no_run
/// use strata_core::Settings;
/// use strata_sources::ConfigOptions;
///
/// let config = ConfigOptions {
///     env: Some("production".to_string()),
///     ..Default::default()
/// }
/// .resolve()?;
/// let host = config.get_string("database.host")?;
/// # Ok::<(), strata_core::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigOptions {
    /// Environment name; falls back to `STRATA_ENV`, then `development`
    pub env: Option<String>,
    /// Configuration root; falls back to `STRATA_CONFIG_DIR`, then `./config`
    pub dir: Option<PathBuf>,
    /// Environment variable prefix
    pub prefix: String,
    /// Load `<dir>/local`
    pub load_local_config: bool,
    /// Evaluate script files (unsafe)
    pub scripts: Option<ScriptOptions>,
    /// Explicit settings layered above the files
    pub json: Option<Value>,
    /// Use these variables instead of the process environment
    pub env_vars: Option<Vec<(String, String)>>,
}

impl Default for ConfigOptions {
    fn default() -> Self {
        Self {
            env: None,
            dir: None,
            prefix: DEFAULT_PREFIX.to_string(),
            load_local_config: true,
            scripts: None,
            json: None,
            env_vars: None,
        }
    }
}

impl ConfigOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve_env(&self) -> String {
        self.env
            .clone()
            .or_else(|| non_empty_var(ENV_VAR))
            .unwrap_or_else(|| DEFAULT_ENV.to_string())
    }

    pub fn resolve_dir(&self) -> PathBuf {
        self.dir
            .clone()
            .or_else(|| non_empty_var(CONFIG_DIR_VAR).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR))
    }

    /// Validate the environment name, then load and fold every layer
    pub fn resolve(&self) -> strata_core::Result<Config> {
        let env = self.resolve_env();
        let dir = self.resolve_dir();
        let mut builder = ConfigBuilder::new(env, self.load_local_config)?;
        tracing::debug!(env = builder.env(), dir = %dir.display(), "Resolving configuration");

        let mut files = FilesSource::new(dir).with_local(self.load_local_config);
        if let Some(scripts) = &self.scripts {
            files = files.with_scripts(scripts.clone());
        }
        for (layer, tree) in files.layers(builder.env())? {
            builder.push(layer, tree);
        }

        if let Some(json) = &self.json {
            builder.push(Layer::Explicit, json.clone());
        }

        let env_source = match &self.env_vars {
            Some(vars) => EnvSource::from_vars(self.prefix.as_str(), vars.clone()),
            None => EnvSource::new(self.prefix.as_str()),
        };
        builder.push(Layer::EnvironmentVariables, env_source.tree());

        Ok(builder.build())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}
