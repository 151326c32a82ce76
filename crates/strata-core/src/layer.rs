//! Precedence layers
//!
//! Sources are folded in a fixed order regardless of the order in which they
//! were produced. Two layer names are reserved because they double as
//! directory names next to the per-environment directories.

use std::fmt;

use crate::{Error, Result};

/// Name of the base layer; not usable as an environment name
pub const DEFAULT_LAYER: &str = "default";

/// Name of the local-override layer; not usable as an environment name
/// while local loading is enabled
pub const LOCAL_LAYER: &str = "local";

/// A precedence layer, least to most overriding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    /// Base defaults shared by every environment
    Default,
    /// Overrides for the selected environment
    Environment,
    /// Developer overrides that are not committed
    Local,
    /// Structured data supplied directly by the caller
    Explicit,
    /// Values taken from environment variables
    EnvironmentVariables,
}

impl Layer {
    /// All layers in fold order
    pub const ALL: [Layer; 5] = [
        Layer::Default,
        Layer::Environment,
        Layer::Local,
        Layer::Explicit,
        Layer::EnvironmentVariables,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::Default => "default",
            Layer::Environment => "environment",
            Layer::Local => "local",
            Layer::Explicit => "explicit",
            Layer::EnvironmentVariables => "environment-variables",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reject environment names that would collide with a reserved layer.
///
/// `default` is always rejected; `local` is rejected only when the local
/// layer is loaded.
pub fn validate_env_name(env: &str, local_enabled: bool) -> Result<()> {
    if env == DEFAULT_LAYER || (local_enabled && env == LOCAL_LAYER) {
        return Err(Error::configuration(format!(
            "'{env}' is not a valid env name: it collides with the '{env}' configuration layer"
        )));
    }
    if env.is_empty() {
        return Err(Error::configuration("the env name must not be empty"));
    }
    Ok(())
}
