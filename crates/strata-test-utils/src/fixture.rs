//! [`ConfigFixture`] builder for configuration directory tests.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary configuration root (`<root>/default`, `<root>/<env>`, ...).
///
/// # Example
///
/// ```rust,no_run
/// use strata_test_utils::ConfigFixture;
///
/// let fixture = ConfigFixture::new()
///     .with_file("default", "db.json", r#"{"host": "default.db"}"#)
///     .with_file("production", "db.yaml", "host: prod.db\n");
/// assert!(fixture.layer_dir("default").is_dir());
/// ```
pub struct ConfigFixture {
    temp_dir: TempDir,
}

impl Default for ConfigFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigFixture {
    /// Create an empty configuration root.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new()
                .unwrap_or_else(|e| panic!("ConfigFixture: failed to create temp dir: {e}")),
        }
    }

    /// Return the configuration root.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Return `<root>/<layer>` (which may not exist yet).
    pub fn layer_dir(&self, layer: &str) -> PathBuf {
        self.root().join(layer)
    }

    /// Write `<root>/<layer>/<name>`, creating the layer directory.
    ///
    /// # Panics
    /// Panics if the filesystem operations fail.
    pub fn write(&self, layer: &str, name: &str, content: &str) -> PathBuf {
        let dir = self.layer_dir(layer);
        fs::create_dir_all(&dir)
            .unwrap_or_else(|e| panic!("ConfigFixture: failed to create {}: {e}", dir.display()));
        let path = dir.join(name);
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("ConfigFixture: failed to write {}: {e}", path.display()));
        path
    }

    /// Builder form of [`write`](Self::write).
    pub fn with_file(self, layer: &str, name: &str, content: &str) -> Self {
        self.write(layer, name, content);
        self
    }

    /// Create `<root>/<layer>` as a plain file, so loading it fails.
    pub fn with_file_instead_of_layer(self, layer: &str) -> Self {
        let path = self.layer_dir(layer);
        fs::write(&path, "not a directory")
            .unwrap_or_else(|e| panic!("ConfigFixture: failed to write {}: {e}", path.display()));
        self
    }
}
