//! Read accessors shared by the resolved configuration and the incremental
//! loader
//!
//! Every accessor returns owned data. Mutating a returned value never touches
//! the stored tree.

use chrono::{DateTime, FixedOffset};
use serde::de::DeserializeOwned;

use crate::{Error, Result, Value};

/// Path-based and typed read access over a merged tree.
///
/// Implementors only provide [`Settings::tree`]; an implementation may use
/// that hook to record that the settings have been read.
pub trait Settings {
    /// The merged tree backing every accessor
    fn tree(&self) -> &Value;

    /// A copy of the entire merged tree
    fn get_all(&self) -> Value {
        self.tree().clone()
    }

    /// A copy of the sub-tree at `path`, or `None` if it does not exist
    fn get(&self, path: &str) -> Option<Value> {
        self.tree().get_path(path).cloned()
    }

    /// Whether `path` exists (a present `null` counts as existing)
    fn contains(&self, path: &str) -> bool {
        self.tree().get_path(path).is_some()
    }

    /// A copy of the sub-tree at `path`.
    ///
    /// Fails with [`Error::NotFound`] if the path is absent. A present `null`
    /// is returned as [`Value::Null`].
    fn get_or_fail(&self, path: &str) -> Result<Value> {
        lookup(self.tree(), path).cloned()
    }

    fn get_string(&self, path: &str) -> Result<String> {
        match lookup(self.tree(), path)? {
            Value::String(s) => Ok(s.clone()),
            other => Err(mismatch(path, "string", other)),
        }
    }

    fn get_number(&self, path: &str) -> Result<f64> {
        match lookup(self.tree(), path)? {
            Value::Number(n) => Ok(*n),
            other => Err(mismatch(path, "number", other)),
        }
    }

    fn get_bool(&self, path: &str) -> Result<bool> {
        match lookup(self.tree(), path)? {
            Value::Bool(b) => Ok(*b),
            other => Err(mismatch(path, "boolean", other)),
        }
    }

    fn get_array(&self, path: &str) -> Result<Vec<Value>> {
        match lookup(self.tree(), path)? {
            Value::Sequence(items) => Ok(items.clone()),
            other => Err(mismatch(path, "array", other)),
        }
    }

    fn get_bytes(&self, path: &str) -> Result<Vec<u8>> {
        match lookup(self.tree(), path)? {
            Value::Bytes(bytes) => Ok(bytes.clone()),
            other => Err(mismatch(path, "bytes", other)),
        }
    }

    fn get_timestamp(&self, path: &str) -> Result<DateTime<FixedOffset>> {
        match lookup(self.tree(), path)? {
            Value::Timestamp(ts) => Ok(*ts),
            other => Err(mismatch(path, "timestamp", other)),
        }
    }

    /// Deserialize the sub-tree at `path` into `T`.
    ///
    /// Bytes arrive as base64 text and timestamps as RFC 3339 text.
    fn get_as<T: DeserializeOwned>(&self, path: &str) -> Result<T>
    where
        Self: Sized,
    {
        let value = lookup(self.tree(), path)?;
        let json = serde_json::to_value(value).map_err(|e| deserialize_error(path, e))?;
        serde_json::from_value(json).map_err(|e| deserialize_error(path, e))
    }

    /// Keys of the root mapping
    fn keys(&self) -> Option<Vec<String>> {
        self.tree().keys()
    }

    /// Keys of the mapping at `path`; `None` if missing or not a mapping
    fn keys_at(&self, path: &str) -> Option<Vec<String>> {
        self.tree().get_path(path).and_then(Value::keys)
    }
}

fn lookup<'a>(tree: &'a Value, path: &str) -> Result<&'a Value> {
    tree.get_path(path).ok_or_else(|| Error::not_found(path))
}

fn mismatch(path: &str, expected: &'static str, found: &Value) -> Error {
    Error::TypeMismatch {
        path: path.to_string(),
        expected,
        found: found.kind(),
    }
}

fn deserialize_error(path: &str, err: serde_json::Error) -> Error {
    Error::Deserialize {
        path: path.to_string(),
        message: err.to_string(),
    }
}
