//! Incremental loading with lock-after-first-read
//!
//! [`ConfigLoader`] merges sources one call at a time. The first read through
//! any accessor locks it: later loads fail with [`Error::Locked`] so values
//! that were already handed out can never go stale.
//!
//! The loader is deliberately `!Sync`. Load everything from one thread, then
//! call [`ConfigLoader::finish`] to obtain a [`Config`] that can be shared.

use std::cell::Cell;

use crate::layer;
use crate::merge;
use crate::settings::Settings;
use crate::source::Source;
use crate::{Config, Error, Result, Value};

/// Whether further sources may be merged in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing has been read yet; loads are permitted
    Open,
    /// At least one accessor ran; loads fail. Terminal.
    Locked,
}

/// Accumulates sources in call order and locks on first read
#[derive(Debug)]
pub struct ConfigLoader {
    env: String,
    tree: Value,
    state: Cell<LoadState>,
}

impl ConfigLoader {
    /// Create an empty loader, rejecting reserved environment names
    pub fn new(env: impl Into<String>, local_enabled: bool) -> Result<Self> {
        let env = env.into();
        layer::validate_env_name(&env, local_enabled)?;
        Ok(Self {
            env,
            tree: Value::mapping(),
            state: Cell::new(LoadState::Open),
        })
    }

    pub fn env(&self) -> &str {
        &self.env
    }

    pub fn state(&self) -> LoadState {
        self.state.get()
    }

    /// Load `source` for this loader's environment and merge it over the
    /// accumulated tree.
    ///
    /// Fails with [`Error::Locked`] without touching the source once any
    /// accessor has been called.
    pub fn load(&mut self, source: &dyn Source) -> Result<()> {
        self.ensure_open()?;
        tracing::debug!(env = %self.env, source = %source.describe(), "Loading configuration source");
        let tree = source.load(&self.env)?;
        merge::merge_into(&mut self.tree, tree);
        Ok(())
    }

    /// Merge an already materialized tree
    pub fn load_value(&mut self, tree: Value) -> Result<()> {
        self.ensure_open()?;
        merge::merge_into(&mut self.tree, tree);
        Ok(())
    }

    /// Freeze into an immutable [`Config`]
    pub fn finish(self) -> Config {
        Config::new(self.env, self.tree)
    }

    fn ensure_open(&self) -> Result<()> {
        match self.state.get() {
            LoadState::Open => Ok(()),
            LoadState::Locked => Err(Error::Locked),
        }
    }
}

impl Settings for ConfigLoader {
    fn tree(&self) -> &Value {
        if self.state.get() == LoadState::Open {
            tracing::debug!(env = %self.env, "Settings read; locking loader");
            self.state.set(LoadState::Locked);
        }
        &self.tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::cell::RefCell;

    struct CountingSource {
        tree: Value,
        calls: RefCell<usize>,
    }

    impl Source for CountingSource {
        fn load(&self, _env: &str) -> Result<Value> {
            *self.calls.borrow_mut() += 1;
            Ok(self.tree.clone())
        }

        fn describe(&self) -> String {
            "counting".into()
        }
    }

    #[test]
    fn loads_merge_in_call_order() {
        let mut loader = ConfigLoader::new("development", true).unwrap();
        loader.load_value(Value::from(json!({"a": {"x": 1, "y": 1}}))).unwrap();
        loader.load(&Value::from(json!({"a": {"y": 2}}))).unwrap();

        assert_eq!(loader.get_all(), Value::from(json!({"a": {"x": 1, "y": 2}})));
    }

    #[test]
    fn starts_open_and_locks_on_first_read() {
        let mut loader = ConfigLoader::new("development", true).unwrap();
        loader.load_value(Value::from(json!({"a": 1}))).unwrap();
        assert_eq!(loader.state(), LoadState::Open);

        assert_eq!(loader.get("a"), Some(Value::from(1.0)));
        assert_eq!(loader.state(), LoadState::Locked);
    }

    #[test]
    fn every_accessor_locks() {
        let reads: [fn(&ConfigLoader); 6] = [
            |l| {
                l.get_all();
            },
            |l| {
                l.get("a");
            },
            |l| {
                let _ = l.get_or_fail("missing");
            },
            |l| {
                let _ = l.get_string("a");
            },
            |l| {
                l.keys();
            },
            |l| {
                l.keys_at("a");
            },
        ];

        for read in reads {
            let mut loader = ConfigLoader::new("development", true).unwrap();
            read(&loader);
            let err = loader.load_value(Value::from(json!({"b": 1}))).unwrap_err();
            assert!(matches!(err, Error::Locked));
        }
    }

    #[test]
    fn locked_loader_does_not_invoke_source() {
        let mut loader = ConfigLoader::new("development", true).unwrap();
        let _ = loader.get_all();

        let source = CountingSource {
            tree: Value::from(json!({"a": 1})),
            calls: RefCell::new(0),
        };
        let err = loader.load(&source).unwrap_err();

        assert!(matches!(err, Error::Locked));
        assert_eq!(*source.calls.borrow(), 0);
        assert_eq!(loader.get_all(), Value::mapping());
    }

    #[test]
    fn locked_error_message_explains_why() {
        let mut loader = ConfigLoader::new("development", true).unwrap();
        let _ = loader.keys();
        let err = loader.load_value(Value::mapping()).unwrap_err();
        assert!(err.to_string().contains("locked"));
    }

    #[test]
    fn rejects_reserved_env_names() {
        assert!(matches!(
            ConfigLoader::new("default", true),
            Err(Error::Configuration { .. })
        ));
        assert!(matches!(
            ConfigLoader::new("local", true),
            Err(Error::Configuration { .. })
        ));
        assert!(ConfigLoader::new("local", false).is_ok());
    }

    #[test]
    fn finish_produces_equivalent_config() {
        let mut loader = ConfigLoader::new("staging", false).unwrap();
        loader.load_value(Value::from(json!({"a": 1}))).unwrap();
        let config = loader.finish();

        assert_eq!(config.env(), "staging");
        assert_eq!(config.get_number("a").unwrap(), 1.0);
    }
}
