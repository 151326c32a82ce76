//! The contract between source providers and the merge engine

use crate::{Result, Value};

/// Something that produces a configuration tree for an environment.
///
/// Providers own all I/O and decoding. A failure is returned as
/// [`Error::Source`](crate::Error::Source) naming the offending resource and
/// is never retried or suppressed by the core.
pub trait Source {
    /// Produce the tree for `env`. Providers that do not vary by environment
    /// ignore the argument.
    fn load(&self, env: &str) -> Result<Value>;

    /// Short description for logs, such as a directory path or a prefix
    fn describe(&self) -> String;
}

impl<S: Source + ?Sized> Source for &S {
    fn load(&self, env: &str) -> Result<Value> {
        (**self).load(env)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<S: Source + ?Sized> Source for Box<S> {
    fn load(&self, env: &str) -> Result<Value> {
        (**self).load(env)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// An already materialized tree is a source that ignores the environment.
impl Source for Value {
    fn load(&self, _env: &str) -> Result<Value> {
        Ok(self.clone())
    }

    fn describe(&self) -> String {
        format!("literal {}", self.kind())
    }
}
