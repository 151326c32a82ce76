//! Environment variable provider
//!
//! Variables named `<prefix><a>__<b>__<c>` become the nested value
//! `{a: {b: {c: "<value>"}}}`. Values are always strings.

use strata_core::{Source, Value};

/// Prefix used when none is configured
pub const DEFAULT_PREFIX: &str = "CONFIG__";

/// Separator between nesting levels in a variable name
pub const NESTING_SEPARATOR: &str = "__";

/// Reads prefixed environment variables into a tree.
///
/// - Variables with an empty value are skipped.
/// - Names are processed in sorted order, so when `A` and `A__B` are both
///   set the deeper path replaces the scalar.
/// - Names with an empty segment (`CONFIG__a____b`) are skipped with a warning.
#[derive(Debug, Clone)]
pub struct EnvSource {
    prefix: String,
    vars: Option<Vec<(String, String)>>,
}

impl Default for EnvSource {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl EnvSource {
    /// Read from the process environment
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            vars: None,
        }
    }

    /// Read from the given variables instead of the process environment
    pub fn from_vars<K, V>(prefix: impl Into<String>, vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            prefix: prefix.into(),
            vars: Some(
                vars.into_iter()
                    .map(|(name, value)| (name.into(), value.into()))
                    .collect(),
            ),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Build the tree from the matching variables
    pub fn tree(&self) -> Value {
        let mut vars: Vec<(String, String)> = match &self.vars {
            Some(vars) => vars.clone(),
            None => std::env::vars_os()
                .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)))
                .collect(),
        };
        vars.retain(|(name, value)| name.starts_with(&self.prefix) && !value.is_empty());
        vars.sort();

        let mut tree = Value::mapping();
        for (name, value) in vars {
            let path: Vec<&str> = name[self.prefix.len()..].split(NESTING_SEPARATOR).collect();
            if path.iter().any(|segment| segment.is_empty()) {
                tracing::warn!(variable = %name, "Skipping environment variable with an empty key segment");
                continue;
            }
            tracing::debug!(variable = %name, "Applying environment variable override");
            tree.set_path(&path, Value::String(value));
        }
        tree
    }
}

impl Source for EnvSource {
    fn load(&self, _env: &str) -> strata_core::Result<Value> {
        Ok(self.tree())
    }

    fn describe(&self) -> String {
        format!("environment variables {}*", self.prefix)
    }
}
