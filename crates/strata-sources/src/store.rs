//! Remote object-store provider
//!
//! Objects live under `<prefix>default/` and `<prefix><env>/`; each object is
//! one file whose basename becomes a top-level key. Objects are fetched
//! concurrently and folded in sorted key order, `default` before the
//! environment.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use strata_core::{DEFAULT_LAYER, Mapping, Source, Value, merge_into};
use tokio::task::JoinSet;

use crate::format::FileFormat;
use crate::{Error, Result};

/// Minimal read-only view of a key/value object store
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// All keys starting with `prefix`
    async fn list(&self, prefix: &str) -> Result<Vec<String>>;

    /// Contents of the object at `key`
    async fn get(&self, key: &str) -> Result<Vec<u8>>;
}

/// In-process object store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    objects: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.objects.insert(key.into(), data.into());
    }

    pub fn with_object(mut self, key: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.insert(key, data);
        self
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .objects
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        self.objects
            .get(key)
            .cloned()
            .ok_or_else(|| Error::store(key, "no such object"))
    }
}

/// Loads configuration files from an [`ObjectStore`].
///
/// Only objects directly under a layer prefix with a recognized data format
/// extension are loaded; scripts are never evaluated from a store.
#[derive(Clone)]
pub struct ObjectStoreSource {
    store: Arc<dyn ObjectStore>,
    prefix: String,
}

impl std::fmt::Debug for ObjectStoreSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStoreSource")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl ObjectStoreSource {
    /// `prefix` is normalized to end with `/` unless empty
    pub fn new(store: Arc<dyn ObjectStore>, prefix: impl Into<String>) -> Self {
        let mut prefix = prefix.into();
        if !prefix.is_empty() && !prefix.ends_with('/') {
            prefix.push('/');
        }
        Self { store, prefix }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Fetch and fold the `default` and `env` objects
    pub async fn fetch(&self, env: &str) -> Result<Value> {
        let mut keys = self.config_keys(DEFAULT_LAYER).await?;
        keys.extend(self.config_keys(env).await?);
        tracing::debug!(prefix = %self.prefix, env, count = keys.len(), "Fetching config objects");

        let mut tasks = JoinSet::new();
        for (index, key) in keys.iter().cloned().enumerate() {
            let store = Arc::clone(&self.store);
            tasks.spawn(async move {
                let data = store.get(&key).await;
                (index, data)
            });
        }

        // Completion order is arbitrary; slot results back by index.
        let mut fetched: Vec<Option<Vec<u8>>> = vec![None; keys.len()];
        while let Some(joined) = tasks.join_next().await {
            let (index, data) = joined
                .map_err(|e| Error::store(self.prefix.as_str(), format!("fetch task failed: {e}")))?;
            fetched[index] = Some(data?);
        }

        let mut settings = Value::mapping();
        for (key, data) in keys.iter().zip(fetched) {
            let data = data.ok_or_else(|| Error::store(key.as_str(), "object was not fetched"))?;
            let Some(basename) = basename(key) else {
                continue;
            };
            let mut layer = Mapping::new();
            layer.insert(basename.to_string(), decode_object(key, &data)?);
            merge_into(&mut settings, Value::Mapping(layer));
        }
        Ok(settings)
    }

    async fn config_keys(&self, layer: &str) -> Result<Vec<String>> {
        let layer_prefix = format!("{}{layer}/", self.prefix);
        let mut keys: Vec<String> = self
            .store
            .list(&layer_prefix)
            .await?
            .into_iter()
            .filter(|key| {
                let name = &key[layer_prefix.len().min(key.len())..];
                !name.contains('/') && object_format(name).is_some()
            })
            .collect();
        keys.sort();
        Ok(keys)
    }
}

fn object_format(key: &str) -> Option<FileFormat> {
    Path::new(key)
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(FileFormat::from_extension)
}

fn basename(key: &str) -> Option<&str> {
    Path::new(key).file_stem().and_then(|stem| stem.to_str())
}

fn decode_object(key: &str, data: &[u8]) -> Result<Value> {
    let format = object_format(key).ok_or_else(|| Error::store(key, "unsupported object type"))?;
    let content =
        std::str::from_utf8(data).map_err(|e| Error::store(key, format!("object is not UTF-8: {e}")))?;
    format.decode(Path::new(key), content)
}

impl Source for ObjectStoreSource {
    /// Blocks on a private current-thread runtime; call [`fetch`](Self::fetch)
    /// from async code instead.
    fn load(&self, env: &str) -> strata_core::Result<Value> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|source| Error::Runtime {
                resource: self.describe(),
                source,
            })?;
        Ok(runtime.block_on(self.fetch(env))?)
    }

    fn describe(&self) -> String {
        format!("object store {}", self.prefix)
    }
}
