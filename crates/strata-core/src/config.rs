//! The resolved configuration
//!
//! [`ConfigBuilder`] validates the environment name, collects one tree per
//! precedence layer and folds them eagerly into a [`Config`]. A `Config` never
//! changes after construction and can be shared freely between threads.

use crate::layer::{self, Layer};
use crate::merge;
use crate::settings::Settings;
use crate::source::Source;
use crate::{Result, Value};

/// The final merged configuration for one environment
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    env: String,
    tree: Value,
}

impl Config {
    /// Wrap an already merged tree
    pub fn new(env: impl Into<String>, tree: Value) -> Self {
        Self {
            env: env.into(),
            tree,
        }
    }

    /// Fold `trees` in the given order (least to most overriding).
    ///
    /// The environment name is validated first, as for [`ConfigBuilder::new`].
    pub fn from_trees<I>(env: impl Into<String>, local_enabled: bool, trees: I) -> Result<Self>
    where
        I: IntoIterator<Item = Value>,
    {
        let env = env.into();
        layer::validate_env_name(&env, local_enabled)?;
        let trees: Vec<Value> = trees.into_iter().collect();
        Ok(Self::new(env, merge::fold(&trees)))
    }

    /// Start building a configuration for `env`
    pub fn builder(env: impl Into<String>, local_enabled: bool) -> Result<ConfigBuilder> {
        ConfigBuilder::new(env, local_enabled)
    }

    /// The environment this configuration was resolved for
    pub fn env(&self) -> &str {
        &self.env
    }
}

impl Settings for Config {
    fn tree(&self) -> &Value {
        &self.tree
    }
}

/// Collects layer trees and folds them in precedence order.
///
/// Trees may be added in any order; [`ConfigBuilder::build`] sorts them by
/// [`Layer`] before folding. Trees added for the same layer keep the order in
/// which they were added.
///
/// # Example
///
/// ```
/// use strata_core::{Config, Layer, Settings, Value};
/// use serde_json::json;
///
/// # fn main() -> strata_core::Result<()> {
/// let config = Config::builder("development", true)?
///     .layer(Layer::Local, Value::from(json!({"db": {"user": "me"}})))
///     .layer(Layer::Default, Value::from(json!({"db": {"user": "app", "port": 5432}})))
///     .build();
///
/// assert_eq!(config.get_string("db.user")?, "me");
/// assert_eq!(config.get_number("db.port")?, 5432.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigBuilder {
    env: String,
    layers: Vec<(Layer, Value)>,
}

impl ConfigBuilder {
    /// Create a builder, rejecting reserved environment names before any
    /// source is loaded
    pub fn new(env: impl Into<String>, local_enabled: bool) -> Result<Self> {
        let env = env.into();
        layer::validate_env_name(&env, local_enabled)?;
        Ok(Self {
            env,
            layers: Vec::new(),
        })
    }

    pub fn env(&self) -> &str {
        &self.env
    }

    /// Add an already materialized tree for `layer`
    pub fn layer(mut self, layer: Layer, tree: Value) -> Self {
        self.push(layer, tree);
        self
    }

    /// Add a tree without consuming the builder
    pub fn push(&mut self, layer: Layer, tree: Value) {
        self.layers.push((layer, tree));
    }

    /// Load `source` for this builder's environment and add it for `layer`.
    ///
    /// Source failures propagate unchanged.
    pub fn source(mut self, layer: Layer, source: impl Source) -> Result<Self> {
        tracing::debug!(%layer, source = %source.describe(), "Loading configuration layer");
        let tree = source.load(&self.env)?;
        self.push(layer, tree);
        Ok(self)
    }

    /// Fold every collected tree into the final configuration
    pub fn build(mut self) -> Config {
        self.layers.sort_by_key(|(layer, _)| *layer);
        let tree = merge::fold(self.layers.iter().map(|(_, tree)| tree));
        tracing::debug!(env = %self.env, layers = self.layers.len(), "Resolved configuration");
        Config::new(self.env, tree)
    }
}
